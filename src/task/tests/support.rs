//! Shared helpers for task unit tests.

use crate::task::domain::{ImageVariant, Resolution};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use image::{ImageFormat, Rgb, RgbImage};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that starts at a fixed instant and advances one second per read.
#[derive(Debug, Default)]
pub struct SteppingClock {
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("fixed start instant is valid")
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Self::start() + Duration::seconds(tick)
    }
}

pub fn resolution(width: u32) -> Resolution {
    Resolution::new(width).expect("test resolutions are positive")
}

pub fn variant(width: u32, name: &str) -> ImageVariant {
    ImageVariant::new(
        resolution(width),
        format!("/images/{name}/{width}/{name}.png"),
        name,
    )
}

/// Writes a solid-colour image of the given size and returns its path.
pub fn write_image(
    dir: &Utf8Path,
    file_name: &str,
    width: u32,
    height: u32,
    format: ImageFormat,
) -> Utf8PathBuf {
    let path = dir.join(file_name);
    RgbImage::from_pixel(width, height, Rgb([200, 120, 40]))
        .save_with_format(&path, format)
        .expect("test image should be written");
    path
}

pub fn utf8_temp_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir path is UTF-8")
}

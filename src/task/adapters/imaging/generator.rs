//! Resized variant generation with the `image` crate.
//!
//! Output layout is `<output_root>/<stem>/<resolution>/<token><ext>` and
//! the public path mirrors it as `<prefix>/<stem>/<resolution>/<token><ext>`.
//! Variants keep the encoded format of the source.

use super::{dimensions::fit_within_width, token::generation_token};
use crate::config::PipelineConfig;
use crate::task::domain::{ImageVariant, Resolution};
use crate::task::ports::{ProcessingError, ProcessingResult, VariantGenerator};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use mockable::Clock;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use tracing::debug;

/// Generates shrink-to-fit variants for every configured resolution.
///
/// The clock supplies the instant behind each variant's token.
pub struct ImageVariantGenerator<C>
where
    C: Clock + Send + Sync + 'static,
{
    config: Arc<PipelineConfig>,
    clock: Arc<C>,
}

impl<C> Clone for ImageVariantGenerator<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> ImageVariantGenerator<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a generator writing under the configured output root.
    #[must_use]
    pub fn new(config: PipelineConfig, clock: Arc<C>) -> Self {
        Self {
            config: Arc::new(config),
            clock,
        }
    }
}

#[async_trait]
impl<C> VariantGenerator for ImageVariantGenerator<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn generate(&self, source: &Utf8Path) -> ProcessingResult<Vec<ImageVariant>> {
        let config = Arc::clone(&self.config);
        let clock = Arc::clone(&self.clock);
        let source = source.to_path_buf();
        tokio::task::spawn_blocking(move || generate_variants(&config, &*clock, &source))
            .await
            .map_err(|err| ProcessingError::Interrupted(Arc::new(err)))?
    }
}

/// Decodes `source` once and writes one variant per configured resolution.
fn generate_variants(
    config: &PipelineConfig,
    clock: &impl Clock,
    source: &Utf8Path,
) -> ProcessingResult<Vec<ImageVariant>> {
    let stem = source
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ProcessingError::UnsupportedFormat(source.to_string()))?;
    let extension = source
        .extension()
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let (image, format) = decode(source)?;

    Dir::create_ambient_dir_all(config.output_root(), ambient_authority())?;
    let output_root = Dir::open_ambient_dir(config.output_root(), ambient_authority())?;

    config
        .resolutions()
        .iter()
        .map(|resolution| {
            let token = generation_token(stem, *resolution, clock.utc());
            let file_name = format!("{token}{extension}");
            let relative = variant_dir(stem, *resolution).join(&file_name);
            let resized = shrink_to_width(&image, resolution.width());
            write_variant(&output_root, &relative, &resized, format)?;
            debug!(
                source = %source,
                resolution = %resolution,
                width = resized.width(),
                height = resized.height(),
                "variant written"
            );
            Ok(ImageVariant::new(
                *resolution,
                format!("{}/{relative}", config.public_prefix()),
                token,
            ))
        })
        .collect()
}

fn decode(source: &Utf8Path) -> ProcessingResult<(DynamicImage, ImageFormat)> {
    let reader = ImageReader::open(source)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| ProcessingError::UnsupportedFormat(source.to_string()))?;
    let image = reader.decode().map_err(|err| ProcessingError::Decode {
        path: source.to_string(),
        cause: Arc::new(err),
    })?;
    Ok((image, format))
}

fn variant_dir(stem: &str, resolution: Resolution) -> Utf8PathBuf {
    Utf8PathBuf::from(stem).join(resolution.to_string())
}

fn shrink_to_width(image: &DynamicImage, target_width: u32) -> DynamicImage {
    let (width, height) = fit_within_width(image.width(), image.height(), target_width);
    if (width, height) == (image.width(), image.height()) {
        return image.clone();
    }
    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn write_variant(
    output_root: &Dir,
    relative: &Utf8Path,
    image: &DynamicImage,
    format: ImageFormat,
) -> ProcessingResult<()> {
    if let Some(parent) = relative.parent() {
        output_root.create_dir_all(parent)?;
    }
    let file = output_root.create(relative)?.into_std();
    let mut writer = BufWriter::new(file);
    image
        .write_to(&mut writer, format)
        .map_err(|err| ProcessingError::Encode {
            path: relative.to_string(),
            cause: Arc::new(err),
        })?;
    writer.flush()?;
    Ok(())
}

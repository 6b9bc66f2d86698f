//! Given steps for task processing BDD scenarios.

use super::world::TaskProcessingWorld;
use eyre::WrapErr;
use image::{ImageFormat, Rgb, RgbImage};
use rstest_bdd_macros::given;

#[given(r#"an input image "{file_name}" of {width} by {height} pixels"#)]
fn input_image(
    world: &mut TaskProcessingWorld,
    file_name: String,
    width: u32,
    height: u32,
) -> Result<(), eyre::Report> {
    let path = world.config.input_root().join(&file_name);
    RgbImage::from_pixel(width, height, Rgb([30, 90, 160]))
        .save_with_format(&path, ImageFormat::Png)
        .wrap_err_with(|| format!("write {path}"))
}

#[given(r#"a corrupt input file "{file_name}""#)]
fn corrupt_input(world: &mut TaskProcessingWorld, file_name: String) -> Result<(), eyre::Report> {
    let path = world.config.input_root().join(&file_name);
    std::fs::write(&path, b"\x89PNG\r\n\x1a\ntruncated").wrap_err_with(|| format!("write {path}"))
}

//! Variant generation backed by the `image` crate.

mod dimensions;
mod generator;
mod token;

pub use dimensions::fit_within_width;
pub use generator::ImageVariantGenerator;
pub use token::generation_token;

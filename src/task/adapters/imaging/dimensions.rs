//! Shrink-to-fit dimension math.

/// Returns the dimensions of an image of `width` x `height` scaled so its
/// width does not exceed `target_width`, preserving the aspect ratio.
///
/// Images already narrow enough keep their size; nothing is ever enlarged.
/// The scaled height is rounded to the nearest pixel and never drops below
/// one.
#[must_use]
pub fn fit_within_width(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width <= target_width || target_width == 0 {
        return (width, height);
    }
    let scaled = u64::from(height)
        .saturating_mul(u64::from(target_width))
        .saturating_add(u64::from(width) >> 1)
        .checked_div(u64::from(width))
        .unwrap_or(u64::from(height));
    let scaled_height = u32::try_from(scaled).unwrap_or(height).max(1);
    (target_width, scaled_height)
}

//! Resizing and masked "over" compositing of the logo.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::mask::AlphaMask;

/// Resizes the logo to exactly `side × side` with a Lanczos3 filter.
///
/// Aspect ratio is not preserved.
pub fn resize_logo(logo: &RgbaImage, side: u32) -> RgbaImage {
    imageops::resize(logo, side, side, FilterType::Lanczos3)
}

/// Multiplies each pixel's alpha by the mask, producing the cut-out logo.
///
/// `logo` and `mask` must have the same dimensions.
pub fn apply_mask(mut logo: RgbaImage, mask: &AlphaMask) -> RgbaImage {
    debug_assert_eq!(logo.dimensions(), (mask.width(), mask.height()));

    for (x, y, pixel) in logo.enumerate_pixels_mut() {
        let m = mask.alpha(x, y) as u16;
        pixel[3] = ((pixel[3] as u16 * m + 127) / 255) as u8;
    }
    logo
}

/// Draws `src` over `dest` with its top-left corner at `(x, y)`.
///
/// Source-over blending; pixels falling outside `dest` are clipped. Fully
/// opaque source pixels replace the destination exactly and fully
/// transparent ones leave it untouched.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(dest, src, x, y);
}

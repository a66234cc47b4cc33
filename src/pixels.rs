//! Pixel buffer and placement rectangle shared by the render stages.

use image::RgbaImage;

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a `side × side` square centered in a `canvas × canvas` area.
    ///
    /// Odd leftovers go to the trailing edge.
    pub fn centered_square(canvas: u32, side: u32) -> Self {
        let offset = canvas.saturating_sub(side) / 2;
        Self::new(offset, offset, side, side)
    }
}

/// An RGBA image owned by exactly one render stage at a time.
///
/// Stages take the buffer by value and hand it back, so no two stages
/// ever hold it at once.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: RgbaImage,
}

impl PixelBuffer {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.data
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.data
    }

    pub fn into_image(self) -> RgbaImage {
        self.data
    }

    /// Returns true if every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.data.pixels().all(|p| p[3] == 255)
    }
}

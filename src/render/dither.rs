//! # Floyd–Steinberg Dithering
//!
//! Converts the padded RGB canvas into a 1-bit [`Monochrome`] bitmap.
//!
//! Error diffusion spreads each pixel's quantization error to its
//! not-yet-visited neighbours:
//!
//! ```text
//!             ┌───────┬───────┐
//!             │   X   │ 7/16  │
//!     ┌───────┼───────┼───────┤
//!     │ 3/16  │ 5/16  │ 1/16  │
//!     └───────┴───────┴───────┘
//! ```
//!
//! The diffusion itself is `image::imageops::dither` with the `BiLevel`
//! colour map. A canvas that is already pure black and white carries no
//! error, so dithering it again reproduces it exactly.

use image::imageops::{self, BiLevel};
use image::{GrayImage, RgbImage};

/// Luma value at or below which a dot is printed.
const BLACK_LEVEL: u8 = 127;

/// A 1-bit bitmap: every pixel is either black (printed) or white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monochrome {
    pixels: GrayImage,
}

impl Monochrome {
    /// Dither an RGB canvas.
    ///
    /// The canvas is only read; the luma plane is a fresh buffer that the
    /// dither pass owns.
    pub fn dither(canvas: &RgbImage) -> Self {
        let mut luma = imageops::grayscale(canvas);
        imageops::dither(&mut luma, &BiLevel);
        Self { pixels: luma }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Bytes per packed row.
    pub fn width_bytes(&self) -> usize {
        (self.width() as usize).div_ceil(8)
    }

    #[inline]
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y)[0] <= BLACK_LEVEL
    }

    /// Pack rows `top..bottom` MSB-first, 1 = black.
    ///
    /// Length = `width_bytes() × (bottom − top)`.
    pub fn pack_rows(&self, top: u32, bottom: u32) -> Vec<u8> {
        let bottom = bottom.min(self.height());
        let mut data = Vec::with_capacity(self.width_bytes() * bottom.saturating_sub(top) as usize);
        for y in top..bottom {
            let row: Vec<bool> = (0..self.width()).map(|x| self.is_black(x, y)).collect();
            data.extend(pack_row(&row));
        }
        data
    }

    /// Back to an 8-bit image (0 or 255), for previews and re-dithering.
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let v = if self.is_black(x, y) { 0 } else { 255 };
            image::Rgb([v, v, v])
        })
    }

    pub fn as_luma(&self) -> &GrayImage {
        &self.pixels
    }
}

/// Pack a row of boolean pixels into bytes.
///
/// Bit 7 is the leftmost pixel; a trailing partial byte is padded with
/// white (0) bits.
///
/// ```
/// use ticketera::render::dither::pack_row;
///
/// assert_eq!(pack_row(&[true, true, false, false, true, false, true, false]), vec![0xCA]);
/// assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, _) in pixels.iter().enumerate().filter(|(_, black)| **black) {
        bytes[i / 8] |= 0x80 >> (i % 8);
    }
    bytes
}

// ============================================================================
// TESTS
// ============================================================================

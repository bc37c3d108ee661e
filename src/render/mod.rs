//! # Rendering Module
//!
//! Turns remote images into printer-ready 1-bit bitmaps.
//!
//! ## Modules
//!
//! - [`image`]: Decode, flatten, fit to the safe zone, center on the canvas
//! - [`dither`]: Floyd–Steinberg conversion and row packing
//!
//! ## Usage Example
//!
//! ```no_run
//! use ticketera::printer::PrinterConfig;
//! use ticketera::render;
//!
//! let bytes = std::fs::read("logo.png")?;
//! let rendered = render::image::render(&bytes, Some(200), &PrinterConfig::NARROW_58MM)?;
//! assert_eq!(rendered.bitmap.width(), 384);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dither;
pub mod image;

use ::image::ImageFormat;
use std::io::Cursor;

use crate::error::TicketeraError;
use dither::Monochrome;

/// Encode a bitmap as PNG (black dots = black pixels).
pub fn bitmap_to_png(bitmap: &Monochrome) -> Result<Vec<u8>, TicketeraError> {
    let mut out = Cursor::new(Vec::new());
    bitmap
        .as_luma()
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| TicketeraError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgb, RgbImage};

    #[test]
    fn test_bitmap_to_png() {
        let bitmap = Monochrome::dither(&RgbImage::from_pixel(16, 4, Rgb([0, 0, 0])));
        let png: Result<Vec<u8>, TicketeraError> = bitmap_to_png(&bitmap);
        let png = png.unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = ::image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (16, 4));
        assert!(decoded.pixels().all(|p| p.0[0] == 0));
    }
}

//! # Image Rendering Pipeline
//!
//! Turns downloaded image bytes into a dithered bitmap as wide as the paper.
//!
//! ```text
//! bytes ─► decode (RGBA) ─► flatten onto white (RGB) ─► resize to content
//!       ─► pad onto canvas (RGB) ─► Floyd–Steinberg (1-bit)
//! ```
//!
//! Every stage takes the previous one by value and returns a new buffer, so
//! at most two full-size images are alive at any time.
//!
//! ## Geometry
//!
//! ```text
//! ├── left_margin ──┼──── content_width ────┼── right_margin ──┤
//! │     white       │   resized image       │      white       │
//! ├────────────────────── canvas_width ────────────────────────┤
//! ```
//!
//! `content_width = min(desired_width or original_width, safe_width)`, the
//! height follows the aspect ratio, and the content is centered with
//! `left_margin = (canvas_width − content_width) / 2`.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};

use super::dither::Monochrome;
use crate::error::OperationError;
use crate::printer::PrinterConfig;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Placement of the content on the paper canvas, in dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub canvas_width: u32,
    pub content_width: u32,
    pub content_height: u32,
    pub left_margin: u32,
}

impl Geometry {
    /// Fit an `original_width × original_height` image onto `config`'s paper.
    ///
    /// ```
    /// use ticketera::printer::PrinterConfig;
    /// use ticketera::render::image::Geometry;
    ///
    /// let g = Geometry::compute(1000, 500, None, &PrinterConfig::NARROW_58MM).unwrap();
    /// assert_eq!((g.content_width, g.content_height, g.left_margin), (300, 150, 42));
    /// ```
    pub fn compute(
        original_width: u32,
        original_height: u32,
        desired_width: Option<u32>,
        config: &PrinterConfig,
    ) -> Result<Self, OperationError> {
        if original_width == 0 || original_height == 0 {
            return Err(OperationError::Image(format!(
                "image has no pixels ({}x{})",
                original_width, original_height
            )));
        }

        let target_width = desired_width.unwrap_or(original_width);
        if target_width == 0 {
            return Err(OperationError::Image("target width is zero".to_string()));
        }

        let content_width = target_width.min(config.safe_width_dots);

        // round(content_width × h / w), in integers
        let numerator = content_width as u64 * original_height as u64;
        let w = original_width as u64;
        let content_height = ((2 * numerator + w) / (2 * w)).max(1);
        let content_height = u32::try_from(content_height).map_err(|_| {
            OperationError::Image(format!("scaled height {} is out of range", content_height))
        })?;

        Ok(Self {
            canvas_width: config.width_dots,
            content_width,
            content_height,
            left_margin: (config.width_dots - content_width) / 2,
        })
    }

    pub fn right_margin(&self) -> u32 {
        self.canvas_width - self.content_width - self.left_margin
    }
}

/// Output of the pipeline: where the content sits and the final bitmap.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub geometry: Geometry,
    pub bitmap: Monochrome,
}

/// Run the whole pipeline on encoded image bytes.
pub fn render(
    bytes: &[u8],
    desired_width: Option<u32>,
    config: &PrinterConfig,
) -> Result<RenderedImage, OperationError> {
    let rgba = decode(bytes)?;
    let geometry = Geometry::compute(rgba.width(), rgba.height(), desired_width, config)?;

    let opaque = flatten_alpha(rgba);
    let content = resize_content(opaque, &geometry);
    let canvas = pad_to_canvas(content, &geometry);
    let bitmap = Monochrome::dither(&canvas);

    Ok(RenderedImage { geometry, bitmap })
}

/// Decode any format the `image` crate knows (and HEIC with the `heif` feature).
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, OperationError> {
    #[cfg(feature = "heif")]
    if heif::is_heic(bytes) {
        return heif::decode(bytes);
    }

    image::load_from_memory(bytes)
        .map(|img| img.into_rgba8())
        .map_err(|e| OperationError::Decode(e.to_string()))
}

/// Composite onto opaque white, using alpha as the blend mask.
///
/// Fully opaque pixels are unchanged.
pub fn flatten_alpha(rgba: RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Lanczos3 resize to `content_width × content_height`.
pub fn resize_content(opaque: RgbImage, geometry: &Geometry) -> RgbImage {
    if opaque.dimensions() == (geometry.content_width, geometry.content_height) {
        return opaque;
    }
    imageops::resize(
        &opaque,
        geometry.content_width,
        geometry.content_height,
        FilterType::Lanczos3,
    )
}

/// Center the content on a white canvas as wide as the paper.
pub fn pad_to_canvas(content: RgbImage, geometry: &Geometry) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(geometry.canvas_width, geometry.content_height, WHITE);
    imageops::replace(&mut canvas, &content, geometry.left_margin as i64, 0);
    canvas
}

#[cfg(feature = "heif")]
mod heif {
    use image::{Rgba, RgbaImage};
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    use crate::error::OperationError;

    /// HEIC/HEIF files carry an `ftyp` box with a HEIF brand at offset 4.
    pub fn is_heic(data: &[u8]) -> bool {
        if data.len() < 12 || &data[4..8] != b"ftyp" {
            return false;
        }
        matches!(
            &data[8..12],
            b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"hevm" | b"hevs" | b"mif1" | b"msf1"
        )
    }

    pub fn decode(data: &[u8]) -> Result<RgbaImage, OperationError> {
        let lib_heif = LibHeif::new();
        let ctx = HeifContext::read_from_bytes(data)
            .map_err(|e| OperationError::Decode(format!("HEIC: {}", e)))?;
        let handle = ctx
            .primary_image_handle()
            .map_err(|e| OperationError::Decode(format!("HEIC primary image: {}", e)))?;
        let image = lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
            .map_err(|e| OperationError::Decode(format!("HEIC: {}", e)))?;

        let planes = image.planes();
        let interleaved = planes
            .interleaved
            .ok_or_else(|| OperationError::Decode("HEIC has no interleaved plane".to_string()))?;

        let (width, height, stride) = (image.width(), image.height(), interleaved.stride);
        let data = interleaved.data;
        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let offset = y as usize * stride + x as usize * 4;
            match data.get(offset..offset + 4) {
                Some(px) => Rgba([px[0], px[1], px[2], px[3]]),
                None => Rgba([255, 255, 255, 255]),
            }
        }))
    }
}

// ============================================================================
// TESTS
// ============================================================================

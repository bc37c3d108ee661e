//! # Printer Configuration
//!
//! Paper geometry for the two receipt widths the daemon supports.
//!
//! | Paper | Canvas (dots) | Bytes/row | Safe zone (dots) |
//! |-------|---------------|-----------|------------------|
//! | 58mm  | 384           | 48        | 300              |
//! | 80mm  | 576           | 72        | 512              |
//!
//! ## Usage
//!
//! ```
//! use ticketera::printer::PrinterConfig;
//!
//! let config = PrinterConfig::for_paper(Some("58mm"));
//! assert_eq!(config.width_dots, 384);
//! assert_eq!(config.safe_width_dots, 300);
//! ```

/// # Printer Configuration
///
/// Geometry of one paper width.
///
/// - **width_dots**: full printable canvas, always a multiple of 8 so every
///   raster row packs into whole bytes
/// - **safe_width_dots**: widest image content that is never clipped by the
///   printer's physical margins
///
/// ```text
/// 58mm:  ├─ 42 ─┼──── 300 safe ────┼─ 42 ─┤  = 384 dots
/// 80mm:  ├─ 32 ─┼──── 512 safe ────┼─ 32 ─┤  = 576 dots
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Paper label as sent by clients ("58mm", "80mm")
    pub name: &'static str,

    /// Full canvas width in dots
    pub width_dots: u32,

    /// Canvas width in bytes (width_dots / 8)
    pub width_bytes: u32,

    /// Maximum image content width in dots
    pub safe_width_dots: u32,
}

impl PrinterConfig {
    /// 58mm paper, 48 bytes per row.
    pub const NARROW_58MM: Self = Self {
        name: "58mm",
        width_dots: 384,
        width_bytes: 48,
        safe_width_dots: 300,
    };

    /// 80mm paper, 72 bytes per row.
    pub const WIDE_80MM: Self = Self {
        name: "80mm",
        width_dots: 576,
        width_bytes: 72,
        safe_width_dots: 512,
    };

    /// Select the configuration for an `anchoImpresora` value.
    ///
    /// Only the exact string `"58mm"` selects narrow paper; anything else
    /// (including a missing value) is 80mm.
    pub fn for_paper(paper: Option<&str>) -> Self {
        match paper {
            Some("58mm") => Self::NARROW_58MM,
            _ => Self::WIDE_80MM,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::WIDE_80MM
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! # ESC/POS Raster Graphics
//!
//! Images are sent with the raster bit image command `GS v 0`, one command
//! per strip (see [`crate::job::transmit`]).
//!
//! ## Bit Packing
//!
//! Each byte carries 8 horizontal dots:
//! - Bit 7 (MSB) = leftmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```

use super::commands::{GS, u16_le};

/// Normal density (m = 0): one data bit per dot in both directions.
pub const RASTER_MODE_NORMAL: u8 = 0;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `width_bytes`: bytes per row (`xL + xH×256`)
/// - `height`: rows (`yL + yH×256`)
/// - `data`: `width_bytes × height` bytes, row-major
///
/// ## Example
///
/// ```
/// use ticketera::protocol::graphics;
///
/// // 48 bytes (384 dots) wide, 2 rows, all black
/// let cmd = graphics::raster(48, 2, &[0xFF; 96]);
/// assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 48, 0, 2, 0]);
/// assert_eq!(cmd.len(), 8 + 96);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    debug_assert_eq!(
        data.len(),
        width_bytes as usize * height as usize,
        "raster data must be width_bytes × height bytes"
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend_from_slice(&[GS, b'v', b'0', RASTER_MODE_NORMAL, xl, xh, yl, yh]);
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================

//! # ESC/POS Commands
//!
//! The handful of text-mode commands the daemon emits: line feeds, character
//! table selection and the cash-drawer pulse.
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

use crate::error::OperationError;

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix (graphics)
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// PAPER FEED
// ============================================================================

/// `n` line feeds.
///
/// ```
/// use ticketera::protocol::commands;
///
/// assert_eq!(commands::line_feeds(2), vec![0x0A, 0x0A]);
/// assert!(commands::line_feeds(0).is_empty());
/// ```
pub fn line_feeds(n: usize) -> Vec<u8> {
    vec![LF; n]
}

// ============================================================================
// CHARACTER TABLE
// ============================================================================

/// # Select Character Code Table (ESC t n)
///
/// | Format  | Bytes     |
/// |---------|-----------|
/// | ASCII   | ESC t n   |
/// | Hex     | 1B 74 n   |
///
/// Common tables: 0 = PC437, 2 = PC850, 16 = WPC1252, 19 = PC858.
/// The table stays selected until the next `ESC t` or `ESC @`.
#[inline]
pub fn select_code_table(table: u8) -> Vec<u8> {
    vec![ESC, b't', table]
}

// ============================================================================
// CASH DRAWER
// ============================================================================

/// Pulse ON time, in 2ms units (50ms).
pub const DRAWER_PULSE_ON: u8 = 25;

/// Pulse OFF time, in 2ms units (500ms).
pub const DRAWER_PULSE_OFF: u8 = 250;

/// # Generate Pulse (ESC p m t1 t2)
///
/// Fires the drawer kick-out connector.
///
/// | Pin | m |
/// |-----|---|
/// | 2   | 0 |
/// | 5   | 1 |
///
/// Most drawers are wired to pin 2.
///
/// ```
/// use ticketera::protocol::commands;
///
/// let cmd = commands::drawer_pulse(2).unwrap();
/// assert_eq!(cmd, vec![0x1B, b'p', 0, 25, 250]);
/// ```
pub fn drawer_pulse(pin: u8) -> Result<Vec<u8>, OperationError> {
    let m = match pin {
        2 => 0,
        5 => 1,
        other => {
            return Err(OperationError::Drawer(format!(
                "drawer connector pin must be 2 or 5, got {}",
                other
            )));
        }
    };
    Ok(vec![ESC, b'p', m, DRAWER_PULSE_ON, DRAWER_PULSE_OFF])
}

/// Convert u16 to little-endian byte pair.
///
/// ```
/// use ticketera::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

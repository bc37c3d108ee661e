//! # ESC/POS Protocol
//!
//! Low-level byte builders for the subset of ESC/POS the daemon speaks.
//!
//! ## Module Structure
//!
//! - [`commands`]: Line feeds, code table selection, drawer pulse
//! - [`graphics`]: Raster bit images (`GS v 0`)
//! - [`codepage`]: Host-side text encoding matching the printer's table
//! - [`cp437`]: Built-in PC437 table
//! - [`oem`]: Other DOS tables (850, 852, 858, 860)
//!
//! ## Usage Example
//!
//! ```
//! use ticketera::protocol::{codepage::Codepage, commands};
//!
//! let mut data = Vec::new();
//! data.extend(commands::line_feeds(2));
//! data.extend(Codepage::Cp437.encode("Hola"));
//! data.extend(commands::drawer_pulse(2).unwrap());
//! ```

pub mod codepage;
pub mod commands;
pub mod cp437;
pub mod graphics;
pub mod oem;

//! # Printer Module
//!
//! Paper geometry for supported receipt widths.
//!
//! ## Modules
//!
//! - [`config`]: Canvas and safe-zone widths per paper size

pub mod config;

pub use config::PrinterConfig;

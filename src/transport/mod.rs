//! # Printer Transport Layer
//!
//! The OS print spooler, seen through two traits:
//!
//! - [`Spooler`]: enumerate printers and open one by name
//! - [`PrintHandle`]: one open printer, driven through the spooler's
//!   document/page protocol and closed exactly once
//!
//! ## Available Backends
//!
//! - [`windows`]: Win32 spooler (`OpenPrinterW` … `ClosePrinter`), RAW datatype
//! - [`device`]: raw device files on Unix (`/dev/usb/lp0`, `/dev/rfcomm0`)
//! - [`recording`]: in-memory spooler for tests and `--dry-run`

#[cfg(unix)]
pub mod device;
pub mod recording;
#[cfg(windows)]
pub mod windows;

#[cfg(unix)]
pub use device::DeviceSpooler;
pub use recording::RecordingSpooler;
#[cfg(windows)]
pub use windows::WindowsSpooler;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::TicketeraError;

/// An open printer.
///
/// Calls arrive in lifecycle order (`start_document`, `start_page`,
/// `write`*, `end_page`, `end_document`, `close`), except during teardown
/// after a failure, when `end_page`/`end_document` may be attempted on a
/// handle whose document or page never started. Implementations must
/// tolerate that.
pub trait PrintHandle: Send {
    fn start_document(&mut self, doc_name: &str) -> Result<(), TicketeraError>;

    fn start_page(&mut self) -> Result<(), TicketeraError>;

    /// Send raw printer bytes.
    fn write(&mut self, data: &[u8]) -> Result<(), TicketeraError>;

    fn end_page(&mut self) -> Result<(), TicketeraError>;

    fn end_document(&mut self) -> Result<(), TicketeraError>;

    /// Release the handle. Consumes it, so it can only happen once.
    fn close(self: Box<Self>) -> Result<(), TicketeraError>;
}

/// Access to the system's printers.
pub trait Spooler: Send + Sync {
    /// Names of the printers jobs can target.
    fn printers(&self) -> Result<Vec<String>, TicketeraError>;

    /// Open the printer called `name`.
    fn open(&self, name: &str) -> Result<Box<dyn PrintHandle>, TicketeraError>;
}

/// The platform's native spooler: Win32 on Windows, device files elsewhere.
#[cfg(windows)]
pub fn system_spooler(_devices: BTreeMap<String, PathBuf>) -> Box<dyn Spooler> {
    Box::new(WindowsSpooler)
}

/// The platform's native spooler: Win32 on Windows, device files elsewhere.
#[cfg(unix)]
pub fn system_spooler(devices: BTreeMap<String, PathBuf>) -> Box<dyn Spooler> {
    Box::new(DeviceSpooler::new(devices))
}

/// Parse a `NAME=PATH` device mapping (for `--device`).
pub fn parse_device_mapping(s: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", s))?;
    let name = name.trim();
    let path = path.trim();
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{}'", s));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_mapping() {
        assert_eq!(
            parse_device_mapping("POS-80=/dev/usb/lp0").unwrap(),
            ("POS-80".to_string(), PathBuf::from("/dev/usb/lp0"))
        );
        assert_eq!(
            parse_device_mapping(" Caja = /dev/rfcomm0 ").unwrap(),
            ("Caja".to_string(), PathBuf::from("/dev/rfcomm0"))
        );
        assert!(parse_device_mapping("POS-80").is_err());
        assert!(parse_device_mapping("=/dev/lp0").is_err());
    }
}

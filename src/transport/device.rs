//! # Raw Device Transport
//!
//! On Unix there is no Win32-style RAW spooler API, so printers are reached
//! through their device nodes: USB printer class (`/dev/usb/lp0`), parallel
//! (`/dev/lp0`), serial or Bluetooth RFCOMM (`/dev/rfcomm0`).
//!
//! ## Printer Names
//!
//! Clients address printers by name. A name resolves to a device through:
//!
//! 1. the `--device NAME=PATH` map, then
//! 2. the name itself, if it is an absolute path.
//!
//! Enumeration lists the mapped names plus every `/dev/usb/lp*` node.
//!
//! ## TTY Configuration
//!
//! Serial and RFCOMM devices are TTYs and would mangle binary data (CR/LF
//! translation, XON/XOFF on 0x11/0x13), so TTYs are switched to raw mode
//! before the first write.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{PrintHandle, Spooler};
use crate::error::TicketeraError;

/// Directory scanned for USB printer-class devices.
const USB_PRINTER_DIR: &str = "/dev/usb";

/// Spooler over raw device files.
#[derive(Debug, Clone, Default)]
pub struct DeviceSpooler {
    devices: BTreeMap<String, PathBuf>,
}

impl DeviceSpooler {
    pub fn new(devices: BTreeMap<String, PathBuf>) -> Self {
        Self { devices }
    }

    /// Device path for a printer name.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if let Some(path) = self.devices.get(name) {
            return Some(path.clone());
        }
        let path = Path::new(name);
        path.is_absolute().then(|| path.to_path_buf())
    }
}

impl Spooler for DeviceSpooler {
    fn printers(&self) -> Result<Vec<String>, TicketeraError> {
        let mut names: Vec<String> = self.devices.keys().cloned().collect();

        match fs::read_dir(USB_PRINTER_DIR) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry.map_err(|e| {
                        TicketeraError::Enumeration(format!("{}: {}", USB_PRINTER_DIR, e))
                    })?;
                    let is_lp = entry.file_name().to_string_lossy().starts_with("lp");
                    if is_lp {
                        names.push(entry.path().display().to_string());
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(TicketeraError::Enumeration(format!(
                    "{}: {}",
                    USB_PRINTER_DIR, e
                )));
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<Box<dyn PrintHandle>, TicketeraError> {
        let path = self.resolve(name).ok_or_else(|| {
            TicketeraError::Transport(format!(
                "Unknown printer '{}' (map it with --device NAME=PATH)",
                name
            ))
        })?;

        let file = OpenOptions::new().write(true).open(&path).map_err(|e| {
            TicketeraError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;

        if is_tty(&file) {
            configure_tty_raw(file.as_raw_fd())?;
        }

        info!(printer = name, device = %path.display(), "device opened");
        Ok(Box::new(DeviceHandle { file, path }))
    }
}

struct DeviceHandle {
    file: File,
    path: PathBuf,
}

impl DeviceHandle {
    fn flush(&mut self) -> Result<(), TicketeraError> {
        self.file.flush().map_err(|e| {
            TicketeraError::Transport(format!("Flush failed on {}: {}", self.path.display(), e))
        })
    }
}

impl PrintHandle for DeviceHandle {
    // Device files have no document or page framing.
    fn start_document(&mut self, doc_name: &str) -> Result<(), TicketeraError> {
        debug!(doc_name, "start document");
        Ok(())
    }

    fn start_page(&mut self) -> Result<(), TicketeraError> {
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TicketeraError> {
        self.file.write_all(data).map_err(|e| {
            TicketeraError::Transport(format!("Write failed on {}: {}", self.path.display(), e))
        })?;
        self.flush()
    }

    fn end_page(&mut self) -> Result<(), TicketeraError> {
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), TicketeraError> {
        self.flush()
    }

    fn close(mut self: Box<Self>) -> Result<(), TicketeraError> {
        self.flush()?;
        self.file.sync_all().or_else(|e| match e.kind() {
            // character devices commonly refuse fsync
            io::ErrorKind::InvalidInput | io::ErrorKind::Unsupported => Ok(()),
            _ => Err(TicketeraError::Transport(format!(
                "Close failed on {}: {}",
                self.path.display(),
                e
            ))),
        })
    }
}

fn is_tty(file: &File) -> bool {
    unsafe { libc::isatty(file.as_raw_fd()) == 1 }
}

/// Put a TTY into raw 8N1 mode with no flow control or echo.
fn configure_tty_raw(fd: i32) -> Result<(), TicketeraError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(TicketeraError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    // Equivalent of cfmakeraw, plus no XON/XOFF: 0x11/0x13 occur in raster data.
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) } != 0 {
        return Err(TicketeraError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

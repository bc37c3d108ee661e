//! # Win32 Spooler Transport
//!
//! Sends RAW documents through the Windows print spooler, so the printer
//! driver passes ESC/POS bytes through untouched.
//!
//! ```text
//! OpenPrinterW ─► StartDocPrinterW (RAW) ─► StartPagePrinter
//!   ─► WritePrinter* ─► EndPagePrinter ─► EndDocPrinter ─► ClosePrinter
//! ```

use core::ffi::c_void;

use tracing::{info, warn};
use ::windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, EnumPrintersW, OpenPrinterW,
    PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_HANDLE, PRINTER_INFO_4W,
    StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use ::windows::core::{PCWSTR, PWSTR};

use super::{PrintHandle, Spooler};
use crate::error::TicketeraError;

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn spooler_error(call: &str) -> TicketeraError {
    TicketeraError::Transport(format!(
        "{} failed: {}",
        call,
        std::io::Error::last_os_error()
    ))
}

/// The Windows print spooler.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSpooler;

impl Spooler for WindowsSpooler {
    /// Local and connected printers (`EnumPrintersW`, level 4).
    fn printers(&self) -> Result<Vec<String>, TicketeraError> {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        unsafe {
            // First call only reports the buffer size.
            let _ = EnumPrintersW(flags, None, 4, None, &mut needed, &mut returned);
            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                4,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|e| TicketeraError::Enumeration(format!("EnumPrintersW failed: {}", e)))?;

            let infos = std::slice::from_raw_parts(
                buf.as_ptr() as *const PRINTER_INFO_4W,
                returned as usize,
            );
            Ok(infos
                .iter()
                .filter(|info| !info.pPrinterName.is_null())
                .filter_map(|info| PWSTR(info.pPrinterName.0).to_string().ok())
                .collect())
        }
    }

    fn open(&self, name: &str) -> Result<Box<dyn PrintHandle>, TicketeraError> {
        let mut handle = PRINTER_HANDLE::default();
        let name_w = to_wide(name);

        unsafe { OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None) }.map_err(
            |e| TicketeraError::Transport(format!("OpenPrinterW('{}') failed: {}", name, e)),
        )?;

        info!(printer = name, "spooler handle opened");
        Ok(Box::new(WindowsHandle { handle }))
    }
}

struct WindowsHandle {
    handle: PRINTER_HANDLE,
}

// The spooler handle is an opaque token owned by exactly one job.
unsafe impl Send for WindowsHandle {}

impl PrintHandle for WindowsHandle {
    fn start_document(&mut self, doc_name: &str) -> Result<(), TicketeraError> {
        let doc_name_w = to_wide(doc_name);
        let datatype_w = to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        let job_id = unsafe { StartDocPrinterW(self.handle, 1, &doc_info as *const DOC_INFO_1W) };
        if job_id == 0 {
            return Err(spooler_error("StartDocPrinterW"));
        }
        Ok(())
    }

    fn start_page(&mut self) -> Result<(), TicketeraError> {
        if !unsafe { StartPagePrinter(self.handle) }.as_bool() {
            return Err(spooler_error("StartPagePrinter"));
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TicketeraError> {
        let mut written: u32 = 0;
        let ok = unsafe {
            WritePrinter(
                self.handle,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            )
        };
        if !ok.as_bool() {
            return Err(spooler_error("WritePrinter"));
        }
        if written as usize != data.len() {
            return Err(TicketeraError::Transport(format!(
                "Incomplete write: {} of {} bytes",
                written,
                data.len()
            )));
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), TicketeraError> {
        if !unsafe { EndPagePrinter(self.handle) }.as_bool() {
            return Err(spooler_error("EndPagePrinter"));
        }
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), TicketeraError> {
        if !unsafe { EndDocPrinter(self.handle) }.as_bool() {
            return Err(spooler_error("EndDocPrinter"));
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), TicketeraError> {
        unsafe { ClosePrinter(self.handle) }.map_err(|e| {
            warn!(error = %e, "ClosePrinter failed");
            TicketeraError::Transport(format!("ClosePrinter failed: {}", e))
        })
    }
}

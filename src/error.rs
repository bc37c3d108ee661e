//! # Error Types
//!
//! Two layers of errors flow through a print job:
//!
//! - [`TicketeraError`]: job-level and process-level failures. These abort the
//!   current job (or the command) and reach the HTTP response.
//! - [`OperationError`]: failures scoped to a single operation. The
//!   interpreter logs them, records them in the job report and moves on.

use thiserror::Error;

/// Main error type for ticketera operations
#[derive(Debug, Error)]
pub enum TicketeraError {
    /// Request rejected before any printer handle was opened
    #[error("{0}")]
    Validation(String),

    /// Spooler or device failure (open, write, close)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Printer enumeration failed
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// Invalid configuration (CLI flags, device map)
    #[error("Invalid config: {0}")]
    Config(String),

    /// Image could not be loaded, rendered or encoded outside a job
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one operation inside a job.
///
/// Never aborts the job; see [`crate::job::JobReport`].
#[derive(Debug, Error)]
pub enum OperationError {
    /// Arguments had the wrong shape or type
    #[error("{operation}: malformed arguments: {reason}")]
    Malformed {
        operation: &'static str,
        reason: String,
    },

    /// Codepage selection failed
    #[error("Codepage error: {0}")]
    Codepage(String),

    /// Drawer pulse could not be encoded
    #[error("Drawer command error: {0}")]
    Drawer(String),

    /// Image download failed (network error or non-success status)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Image bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Geometry or processing failure after decoding
    #[error("Image error: {0}")]
    Image(String),
}

impl OperationError {
    pub(crate) fn malformed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            operation,
            reason: reason.into(),
        }
    }
}

//! # Operation Interpreter
//!
//! Walks a job's operations in order against an open printer handle.
//!
//! ```text
//! WriteText / Feed / Codepage / Drawer ──► TextBuffer
//! PrintImage ──► flush TextBuffer ──► fetch ─► render ─► strips
//! end of job ──► flush TextBuffer
//! ```
//!
//! Text-mode output is buffered so a job without images reaches the printer
//! in a single write, and the buffer is flushed before every image so text
//! queued earlier always prints above it.
//!
//! ## Failure Scope
//!
//! | Failure | Scope |
//! |---------|-------|
//! | [`OperationError`] (bad codepage, fetch, decode, …) | logged, recorded in [`JobReport`], next operation runs |
//! | [`TicketeraError`] (any transport write) | aborts the job |

use tracing::{debug, info, warn};

use super::buffer::TextBuffer;
use super::ops::Operation;
use super::transmit::{self, Pacing};
use crate::error::{OperationError, TicketeraError};
use crate::fetch::ImageFetcher;
use crate::printer::PrinterConfig;
use crate::protocol::commands;
use crate::render;
use crate::transport::PrintHandle;

/// Drawer connector pulsed by `AbrirCajon`.
pub const DRAWER_PIN: u8 = 2;

/// A failed operation.
#[derive(Debug)]
pub struct OperationFailure {
    /// Position in the job's operation list.
    pub index: usize,
    pub operation: String,
    pub error: OperationError,
}

/// What happened while running a job.
#[derive(Debug, Default)]
pub struct JobReport {
    pub operations: usize,
    pub ignored: usize,
    pub images_printed: usize,
    /// Calls to the transport's `write`.
    pub writes: usize,
    pub failures: Vec<OperationFailure>,
}

impl JobReport {
    /// No operation failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Why a single step stopped.
enum StepError {
    Operation(OperationError),
    Job(TicketeraError),
}

impl From<OperationError> for StepError {
    fn from(e: OperationError) -> Self {
        Self::Operation(e)
    }
}

impl From<TicketeraError> for StepError {
    fn from(e: TicketeraError) -> Self {
        Self::Job(e)
    }
}

pub struct Interpreter<'a> {
    handle: &'a mut dyn PrintHandle,
    fetcher: &'a dyn ImageFetcher,
    config: PrinterConfig,
    pacing: Pacing,
    buffer: TextBuffer,
    report: JobReport,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        handle: &'a mut dyn PrintHandle,
        fetcher: &'a dyn ImageFetcher,
        config: PrinterConfig,
        pacing: Pacing,
    ) -> Self {
        Self {
            handle,
            fetcher,
            config,
            pacing,
            buffer: TextBuffer::new(),
            report: JobReport::default(),
        }
    }

    /// Run every operation, then flush whatever text is left.
    pub fn run(mut self, operations: &[Operation]) -> Result<JobReport, TicketeraError> {
        for (index, op) in operations.iter().enumerate() {
            self.report.operations += 1;
            match self.execute(op) {
                Ok(()) => {}
                Err(StepError::Operation(error)) => {
                    warn!(index, operation = op.name(), error = %error, "operation failed");
                    self.report.failures.push(OperationFailure {
                        index,
                        operation: op.name().to_string(),
                        error,
                    });
                }
                Err(StepError::Job(error)) => return Err(error),
            }
        }

        self.flush()?;
        Ok(self.report)
    }

    fn execute(&mut self, op: &Operation) -> Result<(), StepError> {
        match op {
            Operation::WriteText(text) => self.buffer.write_text(text),

            Operation::Feed(lines) => self.buffer.feed(*lines),

            Operation::WriteTextWithCodepage {
                table,
                codepage,
                text,
            } => {
                // Text goes out even when the switch fails, under the old codepage.
                let selected = self.buffer.select_codepage(*table, codepage);
                self.buffer.write_text(text);
                selected?;
            }

            Operation::OpenDrawer => {
                let pulse = commands::drawer_pulse(DRAWER_PIN)?;
                self.buffer.push(&pulse);
            }

            Operation::PrintImage { url, desired_width } => {
                self.print_image(url.as_deref(), *desired_width)?;
            }

            Operation::Ignored { name, reason } => {
                debug!(operation = %name, reason, "operation ignored");
                self.report.ignored += 1;
            }

            Operation::Malformed { operation, reason } => {
                return Err(OperationError::malformed(operation, reason.clone()).into());
            }
        }
        Ok(())
    }

    fn print_image(&mut self, url: Option<&str>, desired_width: Option<u32>) -> Result<(), StepError> {
        self.flush()?;

        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            warn!("image operation without URL skipped");
            return Ok(());
        };

        let bytes = self.fetcher.fetch(url)?;
        let rendered = render::image::render(&bytes, desired_width, &self.config)?;
        drop(bytes);

        let geometry = rendered.geometry;
        info!(
            url,
            content_width = geometry.content_width,
            content_height = geometry.content_height,
            left_margin = geometry.left_margin,
            "image rendered"
        );

        let strips = transmit::send_image(&mut *self.handle, &rendered.bitmap, &self.pacing)?;
        self.report.writes += strips + 1;
        self.report.images_printed += 1;
        Ok(())
    }

    /// Write pending text, if any, in one call.
    fn flush(&mut self) -> Result<(), TicketeraError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let bytes = self.buffer.take();
        self.handle.write(&bytes)?;
        self.report.writes += 1;
        debug!(bytes = bytes.len(), "text flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::recording::RecordingSpooler;
    use crate::transport::Spooler;
    use pretty_assertions::assert_eq;

    struct NoFetch;

    impl ImageFetcher for NoFetch {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, OperationError> {
            Err(OperationError::Fetch(format!("{}: HTTP 404 Not Found", url)))
        }
    }

    fn run(ops: &[Operation]) -> (JobReport, RecordingSpooler) {
        let spooler = RecordingSpooler::new(["P"]);
        let mut handle = spooler.open("P").unwrap();
        let report = Interpreter::new(
            handle.as_mut(),
            &NoFetch,
            PrinterConfig::default(),
            Pacing::immediate(),
        )
        .run(ops)
        .unwrap();
        (report, spooler)
    }

    #[test]
    fn test_text_only_job_is_one_write() {
        let (report, spooler) = run(&[
            Operation::Feed(2),
            Operation::WriteText("Hola".into()),
            Operation::OpenDrawer,
        ]);

        assert_eq!(report.writes, 1);
        assert_eq!(
            spooler.writes(),
            vec![b"\n\nHola\x1bp\x00\x19\xfa".to_vec()]
        );
    }

    #[test]
    fn test_empty_job_writes_nothing() {
        let (report, spooler) = run(&[]);
        assert_eq!(report.writes, 0);
        assert!(spooler.writes().is_empty());
    }

    #[test]
    fn test_ignored_changes_nothing() {
        let (report, spooler) = run(&[Operation::Ignored {
            name: "Cortar".into(),
            reason: "unknown operation",
        }]);
        assert_eq!(report.ignored, 1);
        assert!(report.is_clean());
        assert!(spooler.writes().is_empty());
    }

    #[test]
    fn test_bad_codepage_keeps_text() {
        let (report, spooler) = run(&[Operation::WriteTextWithCodepage {
            table: Some(16),
            codepage: "klingon".into(),
            text: "ñ".into(),
        }]);

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, OperationError::Codepage(_)));
        assert_eq!(spooler.written_bytes(), vec![0xA4]);
    }

    #[test]
    fn test_failed_fetch_does_not_stop_job() {
        let (report, spooler) = run(&[
            Operation::WriteText("antes".into()),
            Operation::PrintImage {
                url: Some("https://example.invalid/logo.png".into()),
                desired_width: None,
            },
            Operation::WriteText("despues".into()),
        ]);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.images_printed, 0);
        assert_eq!(spooler.writes(), vec![b"antes".to_vec(), b"despues".to_vec()]);
    }

    #[test]
    fn test_missing_url_flushes_and_skips() {
        let (report, spooler) = run(&[
            Operation::WriteText("a".into()),
            Operation::PrintImage { url: Some("  ".into()), desired_width: None },
            Operation::WriteText("b".into()),
        ]);

        assert!(report.is_clean());
        assert_eq!(spooler.writes(), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_malformed_is_recorded() {
        let (report, _) = run(&[Operation::Malformed {
            operation: "Feed",
            reason: "expected an integer".into(),
        }]);
        assert!(matches!(report.failures[0].error, OperationError::Malformed { .. }));
    }
}

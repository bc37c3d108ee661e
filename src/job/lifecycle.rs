//! # Job Lifecycle
//!
//! One job owns one printer handle, opened once and closed once.
//!
//! ```text
//! Idle ─► HandleOpened ─► DocumentStarted ─► PageStarted
//!                                                │ body
//!      HandleClosed ◄─ DocumentEnded ◄─ PageEnded ◄┘
//! ```
//!
//! On success the page, document and handle are ended in order. Each step is
//! attempted even if an earlier one failed, and the first failure among them
//! is returned. On failure
//! the same teardown runs best-effort, its errors are logged and dropped, and
//! the original error is returned. A [`Session`] dropped while still holding
//! its handle (the body panicked) tears down from `Drop`.

use tracing::{debug, warn};

use crate::error::TicketeraError;
use crate::transport::{PrintHandle, Spooler};

/// Spooler document name for every job.
pub const DOCUMENT_NAME: &str = "Ticket ticketera";

/// Validation message for a job without a printer name.
pub const MISSING_PRINTER: &str = "The 'nombreImpresora' field is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    HandleOpened,
    DocumentStarted,
    PageStarted,
    PageEnded,
    DocumentEnded,
    HandleClosed,
}

/// An open printer handle and how far through the lifecycle it is.
pub struct Session {
    printer: String,
    handle: Option<Box<dyn PrintHandle>>,
    state: JobState,
}

impl Session {
    /// Open `printer` and start its document and page.
    ///
    /// An empty name is rejected before the spooler is touched. If starting
    /// the document or page fails, the handle is torn down before returning.
    pub fn open(spooler: &dyn Spooler, printer: &str) -> Result<Self, TicketeraError> {
        if printer.trim().is_empty() {
            return Err(TicketeraError::Validation(MISSING_PRINTER.to_string()));
        }

        let handle = spooler.open(printer)?;
        let mut session = Self {
            printer: printer.to_string(),
            handle: Some(handle),
            state: JobState::HandleOpened,
        };

        if let Err(e) = session.start() {
            session.abort();
            return Err(e);
        }
        Ok(session)
    }

    fn start(&mut self) -> Result<(), TicketeraError> {
        self.handle()?.start_document(DOCUMENT_NAME)?;
        self.state = JobState::DocumentStarted;
        self.handle()?.start_page()?;
        self.state = JobState::PageStarted;
        debug!(printer = %self.printer, "page started");
        Ok(())
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// The open handle, for the job body.
    pub fn handle(&mut self) -> Result<&mut (dyn PrintHandle + 'static), TicketeraError> {
        match self.handle.as_deref_mut() {
            Some(handle) => Ok(handle),
            None => Err(TicketeraError::Transport(format!(
                "handle for '{}' is already closed",
                self.printer
            ))),
        }
    }

    /// End page and document, then close. The handle is closed even when
    /// ending fails; the first error wins.
    pub fn finish(mut self) -> Result<(), TicketeraError> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(());
        };

        let ended = self.end(handle.as_mut());
        let closed = handle.close();
        self.state = JobState::HandleClosed;
        debug!(printer = %self.printer, "handle closed");

        ended.and(closed)
    }

    /// Ends the document even if ending the page failed.
    fn end(&mut self, handle: &mut dyn PrintHandle) -> Result<(), TicketeraError> {
        let page = handle.end_page();
        if page.is_ok() {
            self.state = JobState::PageEnded;
        }
        let document = handle.end_document();
        if document.is_ok() && page.is_ok() {
            self.state = JobState::DocumentEnded;
        }
        page.and(document)
    }

    /// Best-effort teardown after a failure. Errors are logged only.
    pub fn abort(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        // The page or document may never have started; the spooler is
        // told to end them anyway and any complaint is ignored.
        if let Err(e) = handle.end_page() {
            debug!(printer = %self.printer, error = %e, "end page during teardown failed");
        }
        if let Err(e) = handle.end_document() {
            debug!(printer = %self.printer, error = %e, "end document during teardown failed");
        }
        if let Err(e) = handle.close() {
            warn!(printer = %self.printer, error = %e, "close during teardown failed");
        }
        self.state = JobState::HandleClosed;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.handle.is_some() {
            warn!(printer = %self.printer, state = ?self.state, "session dropped with open handle");
            self.teardown();
        }
    }
}

/// Run `body` against an open session for `printer`, always closing the
/// handle afterwards.
pub fn with_session<T>(
    spooler: &dyn Spooler,
    printer: &str,
    body: impl FnOnce(&mut dyn PrintHandle) -> Result<T, TicketeraError>,
) -> Result<T, TicketeraError> {
    let mut session = Session::open(spooler, printer)?;

    let outcome = match session.handle() {
        Ok(handle) => body(handle),
        Err(e) => Err(e),
    };
    match outcome {
        Ok(value) => {
            session.finish()?;
            Ok(value)
        }
        Err(e) => {
            session.abort();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::recording::{FailAt, RecordingSpooler, SpoolEvent};
    use pretty_assertions::assert_eq;

    fn closes(events: &[SpoolEvent]) -> usize {
        events.iter().filter(|e| **e == SpoolEvent::Close).count()
    }

    #[test]
    fn test_success_sequence() {
        let spooler = RecordingSpooler::new(["P"]);
        with_session(&spooler, "P", |h| h.write(b"x")).unwrap();

        assert_eq!(
            spooler.events(),
            vec![
                SpoolEvent::Open("P".into()),
                SpoolEvent::StartDocument(DOCUMENT_NAME.into()),
                SpoolEvent::StartPage,
                SpoolEvent::Write(b"x".to_vec()),
                SpoolEvent::EndPage,
                SpoolEvent::EndDocument,
                SpoolEvent::Close,
            ]
        );
    }

    #[test]
    fn test_empty_name_never_opens() {
        let spooler = RecordingSpooler::new(["P"]);
        let result = with_session(&spooler, "  ", |_| Ok(()));
        assert!(matches!(result, Err(TicketeraError::Validation(m)) if m.contains("required")));
        assert!(spooler.events().is_empty());
    }

    #[test]
    fn test_open_failure_has_nothing_to_close() {
        let spooler = RecordingSpooler::new(["P"]).fail_at(FailAt::Open);
        assert!(with_session(&spooler, "P", |_| Ok(())).is_err());
        assert_eq!(closes(&spooler.events()), 0);
    }

    #[test]
    fn test_close_exactly_once_on_every_failure() {
        for step in [
            FailAt::StartDocument,
            FailAt::StartPage,
            FailAt::Write(0),
            FailAt::EndPage,
            FailAt::EndDocument,
            FailAt::Close,
        ] {
            let spooler = RecordingSpooler::new(["P"]).fail_at(step);
            let result = with_session(&spooler, "P", |h| h.write(b"x"));
            assert!(result.is_err(), "{:?} should fail the job", step);
            assert_eq!(closes(&spooler.events()), 1, "{:?}", step);
        }
    }

    #[test]
    fn test_end_page_failure_still_ends_document() {
        let spooler = RecordingSpooler::new(["P"]).fail_at(FailAt::EndPage);
        let result = with_session(&spooler, "P", |h| h.write(b"x"));

        assert!(result.is_err());
        assert_eq!(
            spooler.events()[4..].to_vec(),
            vec![SpoolEvent::EndPage, SpoolEvent::EndDocument, SpoolEvent::Close]
        );
    }

    #[test]
    fn test_body_error_is_returned_after_teardown() {
        let spooler = RecordingSpooler::new(["P"]);
        let result: Result<(), _> = with_session(&spooler, "P", |_| {
            Err(TicketeraError::Transport("boom".into()))
        });

        assert!(matches!(result, Err(TicketeraError::Transport(m)) if m == "boom"));
        assert_eq!(spooler.events().last(), Some(&SpoolEvent::Close));
    }

    #[test]
    fn test_drop_closes_handle() {
        let spooler = RecordingSpooler::new(["P"]);
        {
            let session = Session::open(&spooler, "P").unwrap();
            assert_eq!(session.state(), JobState::PageStarted);
        }
        assert_eq!(closes(&spooler.events()), 1);
    }

    #[test]
    fn test_panicking_body_still_closes() {
        let spooler = RecordingSpooler::new(["P"]);
        let inner = spooler.clone();
        let result = std::panic::catch_unwind(move || {
            let _ = with_session(&inner, "P", |_| -> Result<(), TicketeraError> {
                panic!("body panicked")
            });
        });
        assert!(result.is_err());
        assert_eq!(closes(&spooler.events()), 1);
    }
}

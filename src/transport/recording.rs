//! In-memory spooler.
//!
//! Records every call a job makes so tests can assert on exact ordering and
//! bytes, and so `--dry-run` can exercise the whole pipeline without a
//! printer. Failures can be injected at any lifecycle step.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::{PrintHandle, Spooler};
use crate::error::TicketeraError;

/// One recorded spooler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpoolEvent {
    Open(String),
    StartDocument(String),
    StartPage,
    Write(Vec<u8>),
    EndPage,
    EndDocument,
    Close,
}

/// Where an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Open,
    StartDocument,
    StartPage,
    /// The n-th write of the job (0-based).
    Write(usize),
    EndPage,
    EndDocument,
    Close,
}

type EventLog = Arc<Mutex<Vec<SpoolEvent>>>;

/// Spooler that keeps every event in memory.
///
/// Cloning shares the event log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpooler {
    printers: Vec<String>,
    events: EventLog,
    fail_at: Option<FailAt>,
    enumeration_error: Option<String>,
}

impl RecordingSpooler {
    pub fn new<I, S>(printers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            printers: printers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Fail the given lifecycle step of every job.
    pub fn fail_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Make [`Spooler::printers`] fail with `message`.
    pub fn fail_enumeration(mut self, message: impl Into<String>) -> Self {
        self.enumeration_error = Some(message.into());
        self
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<SpoolEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Payloads of every `write`, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SpoolEvent::Write(data) => Some(data),
                _ => None,
            })
            .collect()
    }

    /// All written bytes concatenated.
    pub fn written_bytes(&self) -> Vec<u8> {
        self.writes().concat()
    }
}

impl Spooler for RecordingSpooler {
    fn printers(&self) -> Result<Vec<String>, TicketeraError> {
        match &self.enumeration_error {
            Some(message) => Err(TicketeraError::Enumeration(message.clone())),
            None => Ok(self.printers.clone()),
        }
    }

    fn open(&self, name: &str) -> Result<Box<dyn PrintHandle>, TicketeraError> {
        let mut handle = RecordingHandle {
            events: self.events.clone(),
            fail_at: self.fail_at,
            writes: 0,
        };
        handle.record(SpoolEvent::Open(name.to_string()), FailAt::Open)?;
        Ok(Box::new(handle))
    }
}

struct RecordingHandle {
    events: EventLog,
    fail_at: Option<FailAt>,
    writes: usize,
}

impl RecordingHandle {
    fn record(&mut self, event: SpoolEvent, step: FailAt) -> Result<(), TicketeraError> {
        debug!(?step, "spooler call recorded");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        if self.fail_at == Some(step) {
            return Err(TicketeraError::Transport(format!("injected failure at {:?}", step)));
        }
        Ok(())
    }
}

impl PrintHandle for RecordingHandle {
    fn start_document(&mut self, doc_name: &str) -> Result<(), TicketeraError> {
        self.record(SpoolEvent::StartDocument(doc_name.to_string()), FailAt::StartDocument)
    }

    fn start_page(&mut self) -> Result<(), TicketeraError> {
        self.record(SpoolEvent::StartPage, FailAt::StartPage)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TicketeraError> {
        let index = self.writes;
        self.writes += 1;
        self.record(SpoolEvent::Write(data.to_vec()), FailAt::Write(index))
    }

    fn end_page(&mut self) -> Result<(), TicketeraError> {
        self.record(SpoolEvent::EndPage, FailAt::EndPage)
    }

    fn end_document(&mut self) -> Result<(), TicketeraError> {
        self.record(SpoolEvent::EndDocument, FailAt::EndDocument)
    }

    fn close(mut self: Box<Self>) -> Result<(), TicketeraError> {
        self.record(SpoolEvent::Close, FailAt::Close)
    }
}

//! # Print Jobs
//!
//! A [`Job`] is one `/imprimir` request: a printer, a paper width and an
//! ordered list of [`Operation`]s. [`run`] drives it from open to close.
//!
//! ## Modules
//!
//! - [`ops`]: the closed operation type built from wire JSON
//! - [`buffer`]: text-mode byte accumulator with the active codepage
//! - [`transmit`]: raster strips with pacing
//! - [`interpreter`]: per-operation dispatch and the [`JobReport`]
//! - [`lifecycle`]: open → document → page → close, on every path
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ticketera::fetch::ImageFetcher;
//! use ticketera::job::{self, Job, JobContext, Operation, Pacing};
//! use ticketera::printer::PrinterConfig;
//! use ticketera::transport::RecordingSpooler;
//!
//! struct Offline;
//! impl ImageFetcher for Offline {
//!     fn fetch(&self, url: &str) -> Result<Vec<u8>, ticketera::error::OperationError> {
//!         Err(ticketera::error::OperationError::Fetch(url.to_string()))
//!     }
//! }
//!
//! let spooler = RecordingSpooler::new(["POS-80"]);
//! let context = JobContext {
//!     spooler: Arc::new(spooler.clone()),
//!     fetcher: Arc::new(Offline),
//!     pacing: Pacing::immediate(),
//! };
//! let job = Job {
//!     printer: "POS-80".into(),
//!     config: PrinterConfig::WIDE_80MM,
//!     operations: vec![Operation::WriteText("Hola".into()), Operation::Feed(1)],
//! };
//!
//! let report = job::run(&job, &context)?;
//! assert!(report.is_clean());
//! assert_eq!(spooler.written_bytes(), b"Hola\n");
//! # Ok::<(), ticketera::error::TicketeraError>(())
//! ```

pub mod buffer;
pub mod interpreter;
pub mod lifecycle;
pub mod ops;
pub mod transmit;

pub use interpreter::{Interpreter, JobReport, OperationFailure};
pub use ops::Operation;
pub use transmit::Pacing;

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::error::TicketeraError;
use crate::fetch::ImageFetcher;
use crate::printer::PrinterConfig;
use crate::transport::Spooler;

/// One print request, validated and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub printer: String,
    pub config: PrinterConfig,
    pub operations: Vec<Operation>,
}

/// Everything a job needs from the process, passed in explicitly.
#[derive(Clone)]
pub struct JobContext {
    pub spooler: Arc<dyn Spooler>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub pacing: Pacing,
}

/// Run `job` to completion on the current thread.
///
/// Blocks for network downloads and pacing delays; async callers run it on
/// `spawn_blocking`. Operation failures are in the report; transport
/// failures are the `Err`.
#[instrument(
    name = "job",
    skip_all,
    fields(
        job_id = %uuid::Uuid::new_v4(),
        printer = %job.printer,
        paper = job.config.name,
        operations = job.operations.len(),
    )
)]
pub fn run(job: &Job, context: &JobContext) -> Result<JobReport, TicketeraError> {
    info!("job started");

    let result = lifecycle::with_session(context.spooler.as_ref(), &job.printer, |handle| {
        Interpreter::new(handle, context.fetcher.as_ref(), job.config, context.pacing)
            .run(&job.operations)
    });

    match &result {
        Ok(report) => info!(
            failures = report.failures.len(),
            ignored = report.ignored,
            images = report.images_printed,
            writes = report.writes,
            "job finished"
        ),
        Err(e) => error!(error = %e, "job failed"),
    }
    result
}

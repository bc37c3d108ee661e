//! # Ticketera - Local ESC/POS Print Daemon
//!
//! Ticketera lets a browser-based point of sale print on a local thermal
//! receipt printer. The web app posts an ordered list of operations (text,
//! feeds, codepage switches, cash-drawer pulses, remote images) and the
//! daemon turns them into one raw ESC/POS job on the OS print spooler.
//!
//! ```text
//! POST /imprimir ─► json_api ─► job::lifecycle ─► job::interpreter
//!                                                   │
//!                        TextBuffer ◄───────────────┤
//!                        fetch ─► render ─► transmit┘
//!                                                   ▼
//!                                              transport
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`server`] | HTTP endpoints (`/version`, `/impresoras`, `/imprimir`) |
//! | [`json_api`] | Request/response bodies |
//! | [`job`] | Operations, interpreter, pacing, handle lifecycle |
//! | [`render`] | Image fitting, centering and dithering |
//! | [`fetch`] | Image download |
//! | [`protocol`] | ESC/POS command builders and codepages |
//! | [`transport`] | Win32 spooler, Unix device files, in-memory recorder |
//! | [`printer`] | Paper geometry |
//! | [`logging`] | Subscriber setup |
//! | [`error`] | Error types |
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ticketera::fetch::HttpFetcher;
//! use ticketera::job::{self, Job, JobContext, Operation, Pacing};
//! use ticketera::printer::PrinterConfig;
//! use ticketera::transport;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let context = JobContext {
//!     spooler: Arc::from(transport::system_spooler(Default::default())),
//!     fetcher: Arc::new(HttpFetcher::new(runtime.handle().clone(), Duration::from_secs(20))?),
//!     pacing: Pacing::default(),
//! };
//!
//! let job = Job {
//!     printer: "POS-80".into(),
//!     config: PrinterConfig::WIDE_80MM,
//!     operations: vec![
//!         Operation::WriteText("Gracias por su compra\n".into()),
//!         Operation::Feed(3),
//!         Operation::OpenDrawer,
//!     ],
//! };
//!
//! job::run(&job, &context)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod fetch;
pub mod job;
pub mod json_api;
pub mod logging;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::{OperationError, TicketeraError};
pub use printer::PrinterConfig;

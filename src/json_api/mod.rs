//! # JSON API
//!
//! The request and response bodies of the HTTP interface, and the
//! conversion from a request body to a typed [`crate::job::Job`].
//!
//! ## Example
//!
//! ```
//! use ticketera::job::Operation;
//! use ticketera::json_api::PrintRequest;
//!
//! let json = r#"{
//!     "nombreImpresora": "POS-58",
//!     "anchoImpresora": "58mm",
//!     "operaciones": [
//!         {"nombre": "EscribirTexto", "argumentos": ["Hola\n"]},
//!         {"nombre": "Cortar", "argumentos": []}
//!     ]
//! }"#;
//!
//! let request: PrintRequest = serde_json::from_str(json).unwrap();
//! let job = request.into_job().unwrap();
//! assert_eq!(job.config.width_dots, 384);
//! assert!(matches!(job.operations[1], Operation::Ignored { .. }));
//! ```

mod convert;
mod schema;

pub use schema::{PrintRequest, RawOperation, StatusResponse};

//! Print handler.
//!
//! Validates the body, waits for the printer's lock when serialization is
//! on, then runs the job on a blocking worker. Operation failures only show
//! up in the log; the response is `ok: true` unless the job itself failed.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use super::failure;
use crate::job;
use crate::json_api::{PrintRequest, StatusResponse};
use crate::server::state::AppState;

/// Success message for `/imprimir`.
pub const PRINT_OK: &str = "Operaciones enviadas correctamente";

/// Handle POST /imprimir.
pub async fn print(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PrintRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed print request");
            return failure(rejection.body_text());
        }
    };

    let job = match request.into_job() {
        Ok(job) => job,
        Err(e) => {
            warn!(error = %e, "print request rejected");
            return failure(e.to_string());
        }
    };

    let guard = match &state.locks {
        Some(locks) => Some(locks.acquire(&job.printer).await),
        None => None,
    };
    let context = state.context.clone();

    let result = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        job::run(&job, &context)
    })
    .await;

    match result {
        Ok(Ok(_report)) => Json(StatusResponse::success(PRINT_OK)).into_response(),
        Ok(Err(e)) => failure(e.to_string()),
        Err(e) => failure(format!("Task error: {}", e)),
    }
}

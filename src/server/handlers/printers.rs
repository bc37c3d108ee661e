//! Printer enumeration handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use super::failure;
use crate::server::state::AppState;

/// Handle GET /impresoras - JSON array of printer names.
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    let spooler = state.context.spooler.clone();

    match tokio::task::spawn_blocking(move || spooler.printers()).await {
        Ok(Ok(names)) => Json(names).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "printer enumeration failed");
            failure(e.to_string())
        }
        Err(e) => failure(format!("Task error: {}", e)),
    }
}

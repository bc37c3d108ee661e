//! Version handler.

use axum::Json;

use crate::json_api::StatusResponse;

/// Handle GET /version.
pub async fn version() -> Json<StatusResponse> {
    Json(StatusResponse::version(env!("CARGO_PKG_VERSION")))
}

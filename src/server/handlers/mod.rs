//! HTTP handlers for the server.

pub mod print;
pub mod printers;
pub mod version;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::json_api::StatusResponse;

/// `{ "ok": false, "message": ... }` with status 500.
pub(super) fn failure(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StatusResponse::failure(message)),
    )
        .into_response()
}

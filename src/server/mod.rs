//! # HTTP Server
//!
//! The local endpoint a browser point-of-sale talks to.
//!
//! | Route | Method | Response |
//! |-------|--------|----------|
//! | `/version` | GET | `{"ok": true, "version": "1.1.0"}` |
//! | `/impresoras` | GET | `["POS-80", ...]` |
//! | `/imprimir` | POST | `{"ok": true, "message": "Operaciones enviadas correctamente"}` |
//!
//! Failures are `{"ok": false, "message": ...}` with status 500. Any origin
//! may call the API (CORS is fully open).
//!
//! ## Usage
//!
//! ```bash
//! ticketera serve --listen 127.0.0.1:8000
//! ```

mod handlers;
mod state;

pub use handlers::print::PRINT_OK;
pub use state::{AppState, PrinterLocks, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::TicketeraError;

/// Build the router. Split from [`serve`] so tests can drive it directly.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/version", get(handlers::version::version))
        .route("/impresoras", get(handlers::printers::list))
        .route("/imprimir", post(handlers::print::print))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ticketera::job::{JobContext, Pacing};
/// use ticketera::server::{serve, AppState, ServerConfig};
/// use ticketera::transport::RecordingSpooler;
///
/// # async fn example(fetcher: Arc<dyn ticketera::fetch::ImageFetcher>) -> Result<(), ticketera::error::TicketeraError> {
/// let config = ServerConfig::default();
/// let context = JobContext {
///     spooler: Arc::new(RecordingSpooler::new(["POS-80"])),
///     fetcher,
///     pacing: Pacing::default(),
/// };
///
/// serve(&config, Arc::new(AppState::new(context, &config))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<(), TicketeraError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            TicketeraError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    info!(
        listen = %config.listen_addr,
        serialize_printers = config.serialize_printers,
        version = env!("CARGO_PKG_VERSION"),
        "ticketera print server started"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| TicketeraError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}

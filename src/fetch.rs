//! Image download for `DescargarImagenDeInternetEImprimir`.
//!
//! Jobs run on a blocking worker thread, so the fetcher is synchronous from
//! the interpreter's point of view. [`HttpFetcher`] drives `reqwest` on the
//! server's runtime through a [`Handle`].

use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, instrument};

use crate::error::{OperationError, TicketeraError};

/// Default download timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Source of encoded image bytes.
pub trait ImageFetcher: Send + Sync {
    /// Download `url`. Network errors and non-success statuses are
    /// [`OperationError::Fetch`].
    fn fetch(&self, url: &str) -> Result<Vec<u8>, OperationError>;
}

/// HTTP(S) fetcher backed by a shared `reqwest::Client`.
pub struct HttpFetcher {
    client: reqwest::Client,
    runtime: Handle,
}

impl HttpFetcher {
    /// Build a fetcher that runs requests on `runtime`.
    ///
    /// Must not be called from inside `runtime`'s async context when
    /// fetching; jobs call it from `spawn_blocking`.
    pub fn new(runtime: Handle, timeout: Duration) -> Result<Self, TicketeraError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ticketera/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TicketeraError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self { client, runtime })
    }
}

impl ImageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> Result<Vec<u8>, OperationError> {
        self.runtime.block_on(async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| OperationError::Fetch(format!("Failed to download {}: {}", url, e)))?;

            if !response.status().is_success() {
                return Err(OperationError::Fetch(format!(
                    "Failed to download {}: HTTP {}",
                    url,
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| OperationError::Fetch(format!("Failed to read image data: {}", e)))?;
            debug!(len = bytes.len(), "image downloaded");
            Ok(bytes.to_vec())
        })
    }
}

//! Server state and configuration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::job::JobContext;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8000")
    pub listen_addr: String,
    /// Run at most one job per printer name at a time
    pub serialize_printers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            serialize_printers: false,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub context: JobContext,
    /// Present when `serialize_printers` is on.
    pub locks: Option<PrinterLocks>,
}

impl AppState {
    pub fn new(context: JobContext, config: &ServerConfig) -> Self {
        Self {
            context,
            locks: config.serialize_printers.then(PrinterLocks::default),
        }
    }
}

/// One async mutex per printer name, created on first use.
#[derive(Default)]
pub struct PrinterLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl PrinterLocks {
    /// Wait for exclusive use of `printer`. Held until the guard drops.
    pub async fn acquire(&self, printer: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(printer.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_printer_waits() {
        let locks = Arc::new(PrinterLocks::default());
        let first = locks.acquire("P").await;

        let waiting = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire("P").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(first);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_printers_do_not_wait() {
        let locks = PrinterLocks::default();
        let _a = locks.acquire("A").await;
        let _b = locks.acquire("B").await;
    }
}

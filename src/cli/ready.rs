//! Server readiness polling
//!
//! Polls the ready route until the server under test answers or the
//! deadline passes. A server that never becomes ready aborts the run.

use std::time::Duration;

use crate::client::{Backend, Method};
use crate::common::{Error, Result};

const POLL_INTERVAL_MS: u64 = 100;

/// Wait until `path` answers with anything below 500
pub async fn wait_until_ready(
    backend: &dyn Backend,
    path: &str,
    timeout: Duration,
) -> Result<()> {
    let deadline = std::time::Instant::now() + timeout;

    loop {
        let exchange = backend.execute(Method::Get, path).await;
        if exchange.is_connected() && exchange.status < 500 {
            tracing::debug!(path, status = exchange.status, "server under test ready");
            return Ok(());
        }

        if std::time::Instant::now() >= deadline {
            return Err(Error::ReadyTimeout(timeout.as_secs()));
        }

        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

//! Server readiness probe.
//!
//! Scenarios are routinely started right after the dev server; the
//! probe polls the base URL until anything answers. The response status
//! is irrelevant — reachability is the signal.

use std::time::Duration;

use anyhow::anyhow;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{HarnessError, HarnessResult};

const RETRY_INTERVAL: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Wait until an HTTP response arrives from `base_url`.
pub async fn wait_for_server(base_url: &str, timeout: Duration) -> HarnessResult<()> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| anyhow!("building probe client: {e}"))?;

    let deadline = Instant::now() + timeout;
    let mut last_error = String::new();
    loop {
        match client.get(base_url).send().await {
            Ok(response) => {
                info!(url = %base_url, status = %response.status(), "server is up");
                return Ok(());
            }
            Err(e) => {
                last_error = e.to_string();
                debug!(url = %base_url, error = %last_error, "server not ready yet");
            }
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::WaitTimeout {
                condition: format!("server at {base_url} ({last_error})"),
            });
        }
        tokio::time::sleep(RETRY_INTERVAL).await;
    }
}

//! Shared HTTP client for catalog access.
//!
//! A single pooled client is built once and cloned wherever a catalog
//! client needs it: connection reuse matters when every request goes to
//! the same host.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

const USER_AGENT: &str = concat!("cpescout/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout. NVD keyword queries regularly take seconds; a
/// request still pending after this is reported as unavailable.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Creates the shared, Arc-wrapped `reqwest::Client` used by catalog
/// clients.
///
/// # Errors
///
/// Returns an error if building the underlying client fails.
pub fn create_shared_client() -> Result<Arc<Client>, reqwest::Error> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(60))
        .build()?;

    Ok(Arc::new(client))
}

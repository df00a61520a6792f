//! Liveness probing of a single candidate node.
//!
//! # Responsibilities
//! - GET `<address><status_path>` with a hard deadline
//! - Classify the outcome as reachable or not
//!
//! # Design Decisions
//! - Transport error, non-2xx status and timeout are all "unreachable"
//! - Nothing propagates to the caller beyond the result; discovery never
//!   shares error handling with forwarding

use std::time::{Duration, Instant, SystemTime};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tokio::time;

use crate::observability::metrics;

/// Outcome of one probe. Used within a single selection cycle only.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub address: String,
    pub reachable: bool,
    pub latency: Duration,
    pub checked_at: SystemTime,
    /// Status code when the node answered at all.
    pub status: Option<u16>,
}

/// Bounded-time liveness check against a node's status endpoint.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: Client,
    status_path: String,
    timeout: Duration,
    user_agent: String,
}

impl HealthProbe {
    pub fn new(
        client: Client,
        status_path: impl Into<String>,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client,
            status_path: status_path.into(),
            timeout,
            user_agent: user_agent.into(),
        }
    }

    /// Returns true when the node answered its status endpoint with 2xx in time.
    pub async fn probe(&self, address: &str) -> bool {
        self.check(address).await.reachable
    }

    /// Probe and keep the details.
    pub async fn check(&self, address: &str) -> ProbeResult {
        let url = status_url(address, &self.status_path);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send();

        let (reachable, status) = match time::timeout(self.timeout, response).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::warn!(node = %address, status = %status, "Probe failed: non-success status");
                }
                (status.is_success(), Some(status.as_u16()))
            }
            Ok(Err(e)) => {
                tracing::warn!(node = %address, error = %e, "Probe failed: connection error");
                (false, None)
            }
            Err(_) => {
                tracing::warn!(node = %address, timeout_ms = self.timeout.as_millis() as u64, "Probe failed: timeout");
                (false, None)
            }
        };

        let latency = started.elapsed();
        metrics::record_probe(address, reachable, latency);

        ProbeResult {
            address: address.to_string(),
            reachable,
            latency,
            checked_at: SystemTime::now(),
            status,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Join a node base URL and an absolute path without doubling the slash.
pub(crate) fn status_url(address: &str, path: &str) -> String {
    format!("{}{}", address.trim_end_matches('/'), path)
}

//! Relaying a request to the active node.
//!
//! # Responsibilities
//! - Rebuild the call against `<node><original path+query>`
//! - Enforce the forwarding deadline over the whole exchange, body included
//! - Classify failures: no active node vs. transport failure
//!
//! # Design Decisions
//! - Non-2xx upstream answers are returned as `Ok`; status and body are
//!   the node's business and pass through byte for byte
//! - No shared state is touched here

use std::time::Duration;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tokio::time;

use crate::error::{ForwardError, TransportError, TransportErrorKind};
use crate::proxy::request::{RequestDescriptor, ResponseDescriptor};

/// Forwards requests to a given node.
#[derive(Debug, Clone)]
pub struct RequestForwarder {
    client: Client,
    timeout: Duration,
    user_agent: String,
}

impl RequestForwarder {
    pub fn new(client: Client, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            timeout,
            user_agent: user_agent.into(),
        }
    }

    /// Relay `request` to `active` and return the node's answer verbatim.
    pub async fn forward(
        &self,
        active: Option<&str>,
        request: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, ForwardError> {
        let node = active.ok_or(ForwardError::NoActiveNode)?;
        let url = format!("{}{}", node.trim_end_matches('/'), request.path);

        tracing::debug!(node = %node, method = %request.method, path = %request.path, "Forwarding request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers.clone())
            .header(USER_AGENT, &self.user_agent);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response.headers().get(CONTENT_TYPE).cloned();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(ResponseDescriptor {
                status,
                content_type,
                body,
            })
        };

        match time::timeout(self.timeout, exchange).await {
            Ok(Ok(response)) => {
                if response.is_upstream_error() {
                    tracing::info!(node = %node, status = %response.status, path = %request.path, "Upstream returned error status");
                }
                Ok(response)
            }
            Ok(Err(e)) => Err(TransportError::from_reqwest(node, &e).into()),
            Err(_) => Err(TransportError::new(
                TransportErrorKind::Timeout,
                node,
                format!("no response within {}ms", self.timeout.as_millis()),
            )
            .into()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

//! At-most-one-retry failover around the forwarder.
//!
//! # Per-request flow
//! ```text
//! active node?
//!   no  → select; still none → NoNodeAvailable (503), stop
//! forward(active)
//!   response (any status)    → return unchanged
//!   transport failure        → invalidate active, select once
//!       new node (possibly the same one) → forward once more
//!       none, or retry fails too         → CommunicationFailed (502)
//! ```
//!
//! Bounded: at most two forwarding attempts and two selection scans per
//! inbound request.

use crate::error::{ForwardError, GatewayError, TransportError};
use crate::health::NodeSelector;
use crate::observability::metrics;
use crate::proxy::forwarder::RequestForwarder;
use crate::proxy::request::{RequestDescriptor, ResponseDescriptor};

/// Total forwarding attempts per request, the first one included.
pub const MAX_ATTEMPTS: u32 = 2;

/// Orchestrates selection, forwarding and failover for each request.
#[derive(Debug, Clone)]
pub struct FailoverController {
    selector: NodeSelector,
    forwarder: RequestForwarder,
}

impl FailoverController {
    pub fn new(selector: NodeSelector, forwarder: RequestForwarder) -> Self {
        Self {
            selector,
            forwarder,
        }
    }

    pub async fn dispatch(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, GatewayError> {
        let mut target = match self.selector.active() {
            Some(node) => node,
            None => {
                tracing::info!(path = %request.path, "No active node, selecting one");
                match self.selector.select_active().await {
                    Some(node) => node,
                    None => return Err(self.no_node_available()),
                }
            }
        };
        let mut failed_node: Option<String> = None;
        let mut attempt = 1;

        loop {
            let error = match self.forwarder.forward(Some(&target), request).await {
                Ok(response) => return Ok(response),
                Err(ForwardError::NoActiveNode) => return Err(self.no_node_available()),
                Err(ForwardError::Transport(error)) => error,
            };

            tracing::warn!(
                node = %target,
                attempt,
                code = error.kind.code(),
                error = %error.message,
                "Transport failure while forwarding"
            );
            let previous = failed_node.get_or_insert_with(|| target.clone()).clone();

            if attempt >= MAX_ATTEMPTS {
                metrics::record_failover("exhausted");
                return Err(self.communication_failed(error, previous));
            }

            if let Some(dropped) = self.selector.active_node().invalidate() {
                metrics::record_active_node(Some(dropped.as_str()), None);
            }
            match self.selector.select_active().await {
                Some(next) => {
                    if next == target {
                        tracing::info!(node = %next, "Failed node is the only reachable one, retrying it once");
                    } else {
                        tracing::info!(from = %target, to = %next, "Failing over");
                    }
                    metrics::record_failover("retried");
                    target = next;
                    attempt += 1;
                }
                None => {
                    metrics::record_failover("no_node");
                    return Err(self.communication_failed(error, previous));
                }
            }
        }
    }

    fn no_node_available(&self) -> GatewayError {
        GatewayError::NoNodeAvailable {
            candidates: self.selector.registry().list(),
        }
    }

    fn communication_failed(&self, source: TransportError, previous: String) -> GatewayError {
        GatewayError::CommunicationFailed {
            source,
            previous: Some(previous),
            candidates: self.selector.registry().list(),
        }
    }

    pub fn selector(&self) -> &NodeSelector {
        &self.selector
    }

    pub fn forwarder(&self) -> &RequestForwarder {
        &self.forwarder
    }
}

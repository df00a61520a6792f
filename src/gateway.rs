//! Gateway instance: one registry, one active node, one upstream client.

use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use url::Url;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, RegistrationError};
use crate::health::{HealthProbe, NodeSelector};
use crate::nodes::{ActiveNode, FailoverState, NodeRegistry};
use crate::proxy::{FailoverController, RequestDescriptor, RequestForwarder, ResponseDescriptor};

/// Snapshot reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    pub connected: bool,
    pub active_node: Option<String>,
    pub state: FailoverState,
    pub known_nodes: Vec<String>,
}

/// Routing core shared by all request handlers.
#[derive(Debug, Clone)]
pub struct Gateway {
    controller: FailoverController,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.proxy.pool_max_idle_per_host)
            .build()?;

        let registry = Arc::new(config.nodes.known.iter().collect::<NodeRegistry>());
        let active = Arc::new(ActiveNode::new());
        let probe = HealthProbe::new(
            client.clone(),
            config.nodes.status_path.clone(),
            config.timeouts.probe(),
            config.proxy.user_agent.clone(),
        );
        let forwarder = RequestForwarder::new(
            client,
            config.timeouts.forward(),
            config.proxy.user_agent.clone(),
        );

        Ok(Self {
            controller: FailoverController::new(
                NodeSelector::new(registry, active, probe),
                forwarder,
            ),
        })
    }

    /// Forward one application call with failover.
    pub async fn dispatch(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor, GatewayError> {
        self.controller.dispatch(request).await
    }

    /// Run a fresh selection scan.
    pub async fn select_active(&self) -> Option<String> {
        self.selector().select_active().await
    }

    /// Validate and register an operator-supplied node address.
    ///
    /// Returns the candidate list after registration.
    pub fn register(&self, raw: &str) -> Result<Vec<String>, RegistrationError> {
        let address = raw.trim();
        if address.is_empty() {
            return Err(RegistrationError::Empty);
        }
        let url = Url::parse(address).map_err(|e| RegistrationError::Malformed {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(RegistrationError::Malformed {
                address: address.to_string(),
                reason: "expected an absolute http or https URL".to_string(),
            });
        }

        if !self.registry().add(address)? {
            return Err(RegistrationError::Duplicate(address.to_string()));
        }
        Ok(self.registry().list())
    }

    pub fn status(&self) -> GatewayStatus {
        let active_node = self.selector().active();
        GatewayStatus {
            connected: active_node.is_some(),
            active_node,
            state: self.selector().active_node().state(),
            known_nodes: self.registry().list(),
        }
    }

    /// Diagnostic for a call that ran past the inbound deadline.
    pub fn timed_out(&self, limit: Duration) -> GatewayError {
        GatewayError::TimedOut {
            limit,
            active: self.selector().active(),
            candidates: self.registry().list(),
        }
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        self.selector().registry()
    }

    pub fn selector(&self) -> &NodeSelector {
        self.controller.selector()
    }
}

//! Active node selection.
//!
//! # Algorithm
//! ```text
//! for address in registry.list() (registration order):
//!     probe(address)
//!     first reachable → cache as active, stop
//! nothing reachable → active = none
//! ```
//!
//! # Design Decisions
//! - First reachable wins; priority is registration order, not latency
//! - Every call is a fresh full scan, no memory of earlier failures
//! - Idempotent and re-entrant; concurrent scans are wasted work, not a bug

use std::sync::Arc;

use crate::health::probe::HealthProbe;
use crate::nodes::{ActiveNode, NodeRegistry};
use crate::observability::metrics;

/// Finds the first reachable candidate and caches it as the active node.
#[derive(Debug, Clone)]
pub struct NodeSelector {
    registry: Arc<NodeRegistry>,
    active: Arc<ActiveNode>,
    probe: HealthProbe,
}

impl NodeSelector {
    pub fn new(registry: Arc<NodeRegistry>, active: Arc<ActiveNode>, probe: HealthProbe) -> Self {
        Self {
            registry,
            active,
            probe,
        }
    }

    /// Scan the registry and cache the first reachable node.
    pub async fn select_active(&self) -> Option<String> {
        self.active.begin_selection();
        let candidates = self.registry.list();

        for address in &candidates {
            let result = self.probe.check(address).await;
            if result.reachable {
                tracing::info!(
                    node = %address,
                    latency_ms = result.latency.as_millis() as u64,
                    "Active node selected"
                );
                let previous = self.active.set(Some(address.clone()));
                metrics::record_active_node(previous.as_deref().map(String::as_str), Some(address));
                return Some(address.clone());
            }
        }

        tracing::warn!(candidates = candidates.len(), "No reachable node found");
        let previous = self.active.set(None);
        metrics::record_active_node(previous.as_deref().map(String::as_str), None);
        None
    }

    /// Cached active node, without probing.
    pub fn active(&self) -> Option<String> {
        self.active.get().map(|node| node.as_ref().clone())
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    pub fn active_node(&self) -> &Arc<ActiveNode> {
        &self.active
    }

    pub fn probe(&self) -> &HealthProbe {
        &self.probe
    }
}

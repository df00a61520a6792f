//! Candidate node registry.
//!
//! # Responsibilities
//! - Hold the ordered, deduplicated list of candidate base URLs
//! - Accept runtime registrations (append-only, never removes)
//! - Hand out the current list to discovery and diagnostics
//!
//! # Design Decisions
//! - Insertion order is probe priority
//! - Dedup by exact string match, no URL normalization
//! - Reads are lock-free snapshots of the latest list; a registration is
//!   visible to every scan that starts after it returns

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::observability::metrics;

/// Ordered, append-only set of candidate node addresses.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: ArcSwap<Vec<String>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `address` if it is not already registered.
    ///
    /// Returns `Ok(true)` when added and `Ok(false)` when the address was
    /// already present. Only emptiness is checked here; a malformed address
    /// simply fails later at probe time.
    pub fn add(&self, address: &str) -> Result<bool, RegistrationError> {
        if address.trim().is_empty() {
            return Err(RegistrationError::Empty);
        }

        let mut inserted = false;
        let previous = self.nodes.rcu(|current| {
            if current.iter().any(|n| n == address) {
                inserted = false;
                Arc::clone(current)
            } else {
                inserted = true;
                let mut next = Vec::with_capacity(current.len() + 1);
                next.extend(current.iter().cloned());
                next.push(address.to_string());
                Arc::new(next)
            }
        });

        if inserted {
            // `rcu` hands back the list it replaced.
            metrics::record_registered_nodes(previous.len() + 1);
            tracing::info!(node = %address, "Node registered");
        }
        Ok(inserted)
    }

    /// Full candidate list in registration order.
    pub fn list(&self) -> Vec<String> {
        self.nodes.load().as_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.load().is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.nodes.load().iter().any(|n| n == address)
    }
}

impl<S: AsRef<str>> FromIterator<S> for NodeRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let registry = Self::new();
        for address in iter {
            // Empty entries are rejected by config validation.
            let _ = registry.add(address.as_ref());
        }
        registry
    }
}

//! Startup discovery.
//!
//! The gateway accepts traffic immediately; this scan only warms the active
//! node and logs whether one was found. Requests arriving before it finishes
//! select lazily on their own.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::gateway::Gateway;

/// Run one selection scan in the background, abandoning it on shutdown.
pub fn spawn_initial_scan(gateway: Gateway, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<Option<String>> {
    tokio::spawn(async move {
        tokio::select! {
            found = gateway.select_active() => {
                match &found {
                    Some(node) => tracing::info!(node = %node, "Startup discovery found an active node"),
                    None => tracing::warn!(
                        candidates = gateway.registry().len(),
                        "Startup discovery found no reachable node; will retry on first request"
                    ),
                }
                found
            }
            _ = shutdown.recv() => None,
        }
    })
}

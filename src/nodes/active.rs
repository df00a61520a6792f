//! Active node holder and failover state.
//!
//! # States
//! ```text
//! NoNode → Selecting → Active
//!   ▲          ▲         │
//!   │          └─────────┘ transport failure (invalidate + rescan)
//!   └── scan found nothing
//! ```
//!
//! # Design Decisions
//! - One holder per gateway instance, never a process global
//! - Writes are last-writer-wins; concurrent failovers may both rescan
//! - State is advisory (for status reporting); the node slot is the source
//!   of truth for routing

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use serde::Serialize;

/// Failover state of a gateway instance.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailoverState {
    NoNode = 0,
    Selecting = 1,
    Active = 2,
}

impl From<u8> for FailoverState {
    fn from(val: u8) -> Self {
        match val {
            1 => FailoverState::Selecting,
            2 => FailoverState::Active,
            _ => FailoverState::NoNode,
        }
    }
}

/// The currently selected, presumed-reachable node.
#[derive(Debug)]
pub struct ActiveNode {
    node: ArcSwapOption<String>,
    state: AtomicU8,
}

impl ActiveNode {
    pub fn new() -> Self {
        Self {
            node: ArcSwapOption::empty(),
            state: AtomicU8::new(FailoverState::NoNode as u8),
        }
    }

    /// Current active node, if any.
    pub fn get(&self) -> Option<Arc<String>> {
        self.node.load_full()
    }

    /// Record the outcome of a selection scan.
    ///
    /// Returns the node it replaced, if any.
    pub fn set(&self, node: Option<String>) -> Option<Arc<String>> {
        let state = if node.is_some() {
            FailoverState::Active
        } else {
            FailoverState::NoNode
        };
        let previous = self.node.swap(node.map(Arc::new));
        self.state.store(state as u8, Ordering::Release);
        previous
    }

    /// Drop the active node after a transport failure.
    ///
    /// Returns the node that was active, if any.
    pub fn invalidate(&self) -> Option<Arc<String>> {
        let previous = self.node.swap(None);
        self.state.store(FailoverState::NoNode as u8, Ordering::Release);
        previous
    }

    /// Mark a selection scan as in progress.
    pub fn begin_selection(&self) {
        self.state.store(FailoverState::Selecting as u8, Ordering::Release);
    }

    pub fn state(&self) -> FailoverState {
        FailoverState::from(self.state.load(Ordering::Acquire))
    }
}

impl Default for ActiveNode {
    fn default() -> Self {
        Self::new()
    }
}

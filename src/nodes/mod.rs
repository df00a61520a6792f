//! Node bookkeeping subsystem.
//!
//! # Data Flow
//! ```text
//! config nodes.known / admin add-node / config reload
//!     → registry.rs (append if absent, ordered)
//!
//! health::selector scan
//!     → registry.rs list() in order
//!     → active.rs (store first reachable, or none)
//!
//! proxy::failover on transport failure
//!     → active.rs invalidate()
//! ```
//!
//! # Design Decisions
//! - Registry and active node are the only shared mutable state
//! - Both are owned by a gateway instance, so several can coexist in tests

pub mod active;
pub mod registry;

pub use active::{ActiveNode, FailoverState};
pub use registry::NodeRegistry;

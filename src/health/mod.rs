//! Node discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Selection (selector.rs), on demand:
//!     registry snapshot, in order
//!     → probe.rs (GET <node>/api/status, bounded timeout)
//!     → first reachable stored in nodes::ActiveNode
//!
//! Triggers:
//!     first request with no active node
//!     transport failure during forwarding (failover)
//!     startup scan, status endpoint with ?refresh=true
//! ```
//!
//! # Design Decisions
//! - No periodic background checks; liveness is only learned when needed
//! - Probe results live for one selection cycle only

pub mod probe;
pub mod selector;

pub use probe::{HealthProbe, ProbeResult};
pub use selector::NodeSelector;

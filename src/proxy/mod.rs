//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! inbound /api/* call
//!     → request.rs (buffer body, keep header subset, keep path+query)
//!     → failover.rs (ensure active node, bounded retry)
//!     → forwarder.rs (relay to <node><path>, 10s deadline)
//!     → ResponseDescriptor (status, content type, raw body)
//! ```

pub mod failover;
pub mod forwarder;
pub mod request;

pub use failover::FailoverController;
pub use forwarder::RequestForwarder;
pub use request::{RequestDescriptor, ResponseDescriptor};

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build Gateway → Bind listener
//!     → startup.rs (background discovery scan, logged)
//!     → serve
//!
//! Shutdown (shutdown.rs):
//!     signals.rs (SIGINT/SIGTERM) → broadcast → server drains, loops exit
//! ```
//!
//! # Design Decisions
//! - Traffic is accepted before discovery completes
//! - Any startup error before binding is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;

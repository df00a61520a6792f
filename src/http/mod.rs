//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client connection
//!     → server.rs (Axum setup, middleware, body buffering)
//!     → request.rs (request id, request span)
//!     → [admin handler | gateway dispatch]
//!     → response.rs (verbatim upstream answer or JSON diagnostic)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, GatewayServer};

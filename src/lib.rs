//! Relay gateway library: a single front door that forwards application
//! calls to the first reachable node and fails over when it stops answering.

pub mod admin;
pub mod config;
pub mod error;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod nodes;
pub mod observability;
pub mod proxy;

pub use config::GatewayConfig;
pub use gateway::Gateway;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;

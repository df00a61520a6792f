//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the relay gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Candidate backend nodes and their status endpoint.
    pub nodes: NodesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Forwarding behaviour.
    pub proxy: ForwardingConfig,

    /// Administrative endpoint settings.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Discovery behaviour.
    pub discovery: DiscoveryConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Candidate node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodesConfig {
    /// Initial candidate base URLs, in probe priority order.
    pub known: Vec<String>,

    /// Path appended to a node's base URL for liveness probes.
    pub status_path: String,
}

impl Default for NodesConfig {
    fn default() -> Self {
        Self {
            // Mainnet, testnet and local development node API ports.
            known: vec![
                "http://localhost:9080".to_string(),
                "http://localhost:4001".to_string(),
                "http://localhost:4000".to_string(),
            ],
            status_path: "/api/status".to_string(),
        }
    }
}

/// Timeout configuration for outbound and inbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Liveness probe timeout in milliseconds.
    pub probe_timeout_ms: u64,

    /// Forwarded call timeout in milliseconds.
    pub forward_timeout_ms: u64,

    /// Total inbound request timeout in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn probe(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn forward(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            forward_timeout_ms: 10_000,
            // Worst case is two scans plus two forwards.
            request_secs: 60,
        }
    }
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Path prefix of forwarded application calls.
    pub api_prefix: String,

    /// User-Agent sent on every outbound call.
    pub user_agent: String,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,

    /// Idle pooled connections kept per node.
    pub pool_max_idle_per_host: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            user_agent: concat!("relay-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
            pool_max_idle_per_host: 16,
        }
    }
}

/// Administrative endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token required for node registration. Open when unset.
    pub api_key: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Run one selection scan in the background right after binding.
    pub scan_on_startup: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            scan_on_startup: true,
        }
    }
}

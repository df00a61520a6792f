//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, parseable bind address)
//! - Check path shapes used to build routes and probe URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("proxy.api_prefix `{0}` must start with `/` and not end with `/`")]
    ApiPrefix(String),

    #[error("nodes.status_path `{0}` must start with `/`")]
    StatusPath(String),

    #[error("nodes.known[{0}] is empty")]
    EmptyNode(usize),

    #[error("proxy.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.probe_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("probe_timeout_ms"));
    }
    if config.timeouts.forward_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("forward_timeout_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    let prefix = &config.proxy.api_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::ApiPrefix(prefix.clone()));
    }

    if !config.nodes.status_path.starts_with('/') {
        errors.push(ValidationError::StatusPath(config.nodes.status_path.clone()));
    }

    for (i, node) in config.nodes.known.iter().enumerate() {
        if node.trim().is_empty() {
            errors.push(ValidationError::EmptyNode(i));
        }
    }

    if config.proxy.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

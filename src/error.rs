//! Gateway error taxonomy.
//!
//! Only [`TransportError`] triggers automatic failover. Upstream error
//! statuses are not errors at all: they travel back to the caller inside a
//! normal [`ResponseDescriptor`](crate::proxy::ResponseDescriptor).

use std::time::Duration;
use thiserror::Error;

/// Rejected node registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Empty or whitespace-only address.
    #[error("node address must not be empty")]
    Empty,

    /// Address is not an absolute http(s) URL.
    #[error("node address `{address}` is not a valid http(s) URL: {reason}")]
    Malformed { address: String, reason: String },

    /// Address is already registered.
    #[error("node address `{0}` is already registered")]
    Duplicate(String),
}

/// Connection-level failure class, mapped to the diagnostic codes clients
/// already understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    ConnectionRefused,
    HostUnresolved,
    Timeout,
    InvalidAddress,
    Other,
}

impl TransportErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            TransportErrorKind::ConnectionRefused => "ECONNREFUSED",
            TransportErrorKind::HostUnresolved => "ENOTFOUND",
            TransportErrorKind::Timeout => "ETIMEDOUT",
            TransportErrorKind::InvalidAddress => "EINVALIDURL",
            TransportErrorKind::Other => "ECONNRESET",
        }
    }
}

/// Failure to get any response at all out of a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} reaching {node}: {message}", .kind.code())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub node: String,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, node: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            node: node.into(),
            message: message.into(),
        }
    }

    /// Classify a reqwest failure.
    pub fn from_reqwest(node: &str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_builder() {
            TransportErrorKind::InvalidAddress
        } else if err.is_connect() {
            classify_connect(err)
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, node, error_chain(err))
    }
}

/// Distinguish refused connections from failed name resolution by walking the
/// source chain; reqwest does not expose typed DNS errors.
fn classify_connect(err: &(dyn std::error::Error + 'static)) -> TransportErrorKind {
    let mut source = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return TransportErrorKind::ConnectionRefused;
            }
        }
        let text = e.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return TransportErrorKind::HostUnresolved;
        }
        source = e.source();
    }
    TransportErrorKind::ConnectionRefused
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}

/// Outcome of a single forwarding attempt that produced no upstream response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    /// Forwarding was attempted with no active node.
    #[error("no active node selected")]
    NoActiveNode,

    /// The node could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors surfaced to gateway callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No candidate answered its liveness probe.
    #[error("no node available among {} candidates", .candidates.len())]
    NoNodeAvailable { candidates: Vec<String> },

    /// Forwarding failed at transport level and failover did not recover.
    #[error("upstream communication failed: {source}")]
    CommunicationFailed {
        source: TransportError,
        previous: Option<String>,
        candidates: Vec<String>,
    },

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The inbound call ran past `timeouts.request_secs`.
    #[error("request did not complete within {}s", .limit.as_secs())]
    TimedOut {
        limit: Duration,
        active: Option<String>,
        candidates: Vec<String>,
    },

    /// Inbound body exceeded the configured limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Inbound request could not be read or decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Path outside the forwarded prefix and the admin endpoints.
    #[error("no such endpoint: {0}")]
    NotFound(String),

    /// Admin token missing or wrong.
    #[error("missing or invalid admin token")]
    Unauthorized,

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

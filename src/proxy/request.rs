//! Request and response descriptors exchanged with upstream nodes.
//!
//! # Design Decisions
//! - Inbound bodies are buffered so a failed attempt can be replayed once
//! - Only a fixed header subset crosses the gateway; hop-by-hop and host
//!   headers never reach the node
//! - Upstream responses are kept as raw bytes and never reparsed

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

/// Inbound headers copied onto forwarded calls.
pub const FORWARDED_HEADERS: [HeaderName; 3] = [
    header::AUTHORIZATION,
    header::ACCEPT,
    HeaderName::from_static("x-request-id"),
];

/// Everything needed to replay an inbound call against a node.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Original path including the query string.
    pub path: String,
    /// Forwarding-relevant header subset.
    pub headers: HeaderMap,
    /// Absent for bodiless calls.
    pub body: Option<Bytes>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Build from inbound request parts and an already-buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let mut headers = HeaderMap::new();
        for name in FORWARDED_HEADERS.iter() {
            if let Some(value) = parts.headers.get(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        Self {
            method: parts.method.clone(),
            path,
            headers,
            body: None,
        }
        .with_body(body)
    }
}

/// Upstream answer, passed back to the caller untouched.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl ResponseDescriptor {
    /// The node answered with a non-success status. This is a business
    /// response, not a gateway failure.
    pub fn is_upstream_error(&self) -> bool {
        !self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn from_parts_keeps_query_and_header_subset() {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .uri("http://gateway.local/api/transfer?dry_run=1&fee=low")
            .header("authorization", "Bearer t")
            .header("host", "gateway.local")
            .header("cookie", "session=1")
            .header("x-request-id", "req-1")
            .body(())
            .unwrap()
            .into_parts();

        let desc = RequestDescriptor::from_parts(&parts, Bytes::from_static(b"{\"amount\":5}"));
        assert_eq!(desc.method, Method::POST);
        assert_eq!(desc.path, "/api/transfer?dry_run=1&fee=low");
        assert_eq!(desc.headers.len(), 2);
        assert_eq!(desc.headers["authorization"], "Bearer t");
        assert_eq!(desc.headers["x-request-id"], "req-1");
        assert!(desc.headers.get("host").is_none());
        assert_eq!(desc.body.as_deref(), Some(&b"{\"amount\":5}"[..]));
    }

    #[test]
    fn empty_body_is_absent() {
        let desc = RequestDescriptor::new(Method::GET, "/api/blocks").with_body(Bytes::new());
        assert!(desc.body.is_none());
    }

    #[test]
    fn upstream_error_classification() {
        let ok = ResponseDescriptor {
            status: StatusCode::CREATED,
            content_type: None,
            body: Bytes::new(),
        };
        let err = ResponseDescriptor {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            ..ok.clone()
        };
        assert!(!ok.is_upstream_error());
        assert!(err.is_upstream_error());
    }
}

//! Response shaping.
//!
//! # Responsibilities
//! - Hand upstream answers back untouched (status, content type, bytes)
//! - Turn every gateway failure into a structured JSON diagnostic
//!
//! # Payloads
//! ```text
//! 503 no node:       {success, error, suggestion, knownNodes, checkedNodes}
//! 502 comm. failure: {success, error, details, suggestion, previousNode,
//!                     knownNodes, errorInfo: {code, message, node}}
//! 504 timed out:     {success, error, suggestion, activeNode, knownNodes}
//! anything else:     {success, error}  (4xx, or 500 for client setup)
//! ```

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{GatewayError, RegistrationError};
use crate::proxy::ResponseDescriptor;

impl IntoResponse for ResponseDescriptor {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckedNode {
    url: String,
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NoNodeBody {
    success: bool,
    error: &'static str,
    suggestion: &'static str,
    known_nodes: Vec<String>,
    checked_nodes: Vec<CheckedNode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorInfo {
    code: &'static str,
    message: String,
    node: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommunicationBody {
    success: bool,
    error: &'static str,
    details: String,
    suggestion: &'static str,
    previous_node: Option<String>,
    known_nodes: Vec<String>,
    error_info: ErrorInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimedOutBody {
    success: bool,
    error: String,
    suggestion: &'static str,
    active_node: Option<String>,
    known_nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SimpleBody {
    success: bool,
    error: String,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NoNodeAvailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::CommunicationFailed { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Registration(RegistrationError::Duplicate(_)) => StatusCode::CONFLICT,
            GatewayError::Registration(_) => StatusCode::BAD_REQUEST,
            GatewayError::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            GatewayError::NoNodeAvailable { candidates } => {
                let checked_nodes = candidates
                    .iter()
                    .map(|url| CheckedNode {
                        url: url.clone(),
                        status: "not_responding",
                    })
                    .collect();
                let body = NoNodeBody {
                    success: false,
                    error: "no node available",
                    suggestion: "start a local node or register another node address",
                    known_nodes: candidates,
                    checked_nodes,
                };
                (status, Json(body)).into_response()
            }
            GatewayError::CommunicationFailed {
                source,
                previous,
                candidates,
            } => {
                let body = CommunicationBody {
                    success: false,
                    error: "upstream communication failed",
                    details: source.to_string(),
                    suggestion: "check that the node is running and reachable",
                    previous_node: previous,
                    known_nodes: candidates,
                    error_info: ErrorInfo {
                        code: source.kind.code(),
                        message: source.message,
                        node: source.node,
                    },
                };
                (status, Json(body)).into_response()
            }
            GatewayError::TimedOut {
                limit,
                active,
                candidates,
            } => {
                let body = TimedOutBody {
                    success: false,
                    error: format!("request did not complete within {}s", limit.as_secs()),
                    suggestion: "candidate nodes are slow to answer; retry or raise timeouts.request_secs",
                    active_node: active,
                    known_nodes: candidates,
                };
                (status, Json(body)).into_response()
            }
            other => {
                let body = SimpleBody {
                    success: false,
                    error: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TransportError, TransportErrorKind};
    use axum::body::{to_bytes, Bytes};
    use axum::http::HeaderValue;
    use serde_json::Value;

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_response_is_verbatim() {
        let raw = Bytes::from_static(b"{ \"odd\" :  [1,2] }");
        let response = ResponseDescriptor {
            status: StatusCode::IM_A_TEAPOT,
            content_type: Some(HeaderValue::from_static("application/json; charset=utf-8")),
            body: raw.clone(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        assert_eq!(to_bytes(response.into_body(), usize::MAX).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn no_node_payload_lists_candidates() {
        let response = GatewayError::NoNodeAvailable {
            candidates: vec!["http://a".into(), "http://b".into()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["knownNodes"], serde_json::json!(["http://a", "http://b"]));
        assert_eq!(body["checkedNodes"][1]["url"], "http://b");
        assert_eq!(body["checkedNodes"][1]["status"], "not_responding");
    }

    #[tokio::test]
    async fn communication_payload_carries_diagnostics() {
        let response = GatewayError::CommunicationFailed {
            source: TransportError::new(TransportErrorKind::ConnectionRefused, "http://b", "refused"),
            previous: Some("http://a".into()),
            candidates: vec!["http://a".into(), "http://b".into()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["previousNode"], "http://a");
        assert_eq!(body["errorInfo"]["code"], "ECONNREFUSED");
        assert_eq!(body["errorInfo"]["node"], "http://b");
        assert_eq!(body["knownNodes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn timed_out_payload_reports_nodes() {
        let response = GatewayError::TimedOut {
            limit: std::time::Duration::from_secs(3),
            active: None,
            candidates: vec!["http://slow".into()],
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["activeNode"], Value::Null);
        assert_eq!(body["knownNodes"], serde_json::json!(["http://slow"]));
    }

    #[test]
    fn client_setup_failure_is_internal() {
        let err = reqwest::Client::builder()
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        assert_eq!(GatewayError::from(err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn registration_errors_map_to_client_statuses() {
        let dup = GatewayError::from(RegistrationError::Duplicate("http://a".into()));
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);

        let response = GatewayError::from(RegistrationError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "node address must not be empty");
    }
}

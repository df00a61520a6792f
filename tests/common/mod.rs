//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use relay_gateway::{GatewayConfig, GatewayServer, Shutdown};

/// A mock backend node bound to an ephemeral port.
pub struct MockNode {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
    stop: Option<oneshot::Sender<()>>,
}

impl MockNode {
    /// Number of forwarded (non-status) calls the node has answered.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Stop accepting connections. The port is released once the server exits.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        // Give the server task a moment to drop its listener.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

/// Start a node whose status endpoint answers 200 and whose API echoes
/// `{node, method, path, body}` back as JSON.
pub async fn start_node(name: &'static str) -> MockNode {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/status", get(|| async { Json(json!({ "ok": true })) }))
        .route("/api/fail", any(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "rejected by node") }))
        .fallback(echo)
        .with_state((name, hits.clone()));
    serve(app, hits).await
}

async fn echo(
    State((name, hits)): State<(&'static str, Arc<AtomicUsize>)>,
    request: Request,
) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    Json(json!({
        "node": name,
        "method": method,
        "path": path,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn serve(app: Router, hits: Arc<AtomicUsize>) -> MockNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
            .unwrap();
    });
    MockNode {
        url: format!("http://{addr}"),
        hits,
        stop: Some(stop_tx),
    }
}

/// An address nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Config for tests: given candidates, short timeouts, no pooled connections.
pub fn test_config(nodes: Vec<String>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.nodes.known = nodes;
    config.timeouts.probe_timeout_ms = 1_000;
    config.timeouts.forward_timeout_ms = 2_000;
    config.proxy.pool_max_idle_per_host = 0;
    config.discovery.scan_on_startup = false;
    config
}

/// Running gateway bound to an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config).unwrap();
    let (_tx, updates) = tokio::sync::mpsc::unbounded_channel();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, updates, rx).await.unwrap();
    });
    TestGateway { addr, shutdown }
}

/// Client without connection reuse so a stopped node is observed immediately.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

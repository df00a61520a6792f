//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: admin endpoints, `<prefix>/*` forwarding, JSON 404
//! - Wire up middleware (request id, tracing, CORS)
//! - Bound every forwarded call by `timeouts.request_secs`, answering 504 JSON
//! - Buffer inbound bodies and hand calls to the gateway
//! - Apply reloaded node lists and stop on the shutdown broadcast

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use http_body_util::LengthLimitError;
use tokio::time;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::startup::spawn_initial_scan;
use crate::observability::metrics;
use crate::proxy::RequestDescriptor;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub config: Arc<GatewayConfig>,
}

/// HTTP front of the relay gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
    gateway: Gateway,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = Gateway::new(&config)?;
        let config = Arc::new(config);

        let state = AppState {
            gateway: gateway.clone(),
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            gateway,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let prefix = config.proxy.api_prefix.as_str();

        Router::new()
            .route(&format!("{prefix}/{{*path}}"), any(proxy_handler))
            .route(prefix, any(proxy_handler))
            .merge(setup_admin_router(state.clone(), prefix))
            .fallback(not_found)
            .with_state(state)
            .layer(cors_layer())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// Serve until the shutdown broadcast fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_prefix = %self.config.proxy.api_prefix,
            candidates = self.gateway.registry().len(),
            "HTTP server starting"
        );

        if self.config.discovery.scan_on_startup {
            spawn_initial_scan(self.gateway.clone(), shutdown.resubscribe());
        }

        let gateway = self.gateway.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => apply_reload(&gateway, &config),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Append newly listed nodes; nothing is ever removed.
fn apply_reload(gateway: &Gateway, config: &GatewayConfig) {
    let added = config
        .nodes
        .known
        .iter()
        .filter(|node| matches!(gateway.registry().add(node), Ok(true)))
        .count();
    tracing::info!(
        added,
        candidates = gateway.registry().len(),
        "Applied reloaded node list"
    );
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Forward an application call through the gateway.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();

    // Control requests are answered here.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let limit = state.config.proxy.max_body_size;
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return GatewayError::PayloadTooLarge { limit }.into_response();
    }

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_limit(&e) => {
            tracing::warn!(limit, "Request body over limit");
            return GatewayError::PayloadTooLarge { limit }.into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return GatewayError::InvalidRequest(format!("failed to read request body: {e}"))
                .into_response();
        }
    };
    let descriptor = RequestDescriptor::from_parts(&parts, body);

    let deadline = state.config.timeouts.request();
    let result = match time::timeout(deadline, state.gateway.dispatch(&descriptor)).await {
        Ok(result) => result,
        Err(_) => Err(state.gateway.timed_out(deadline)),
    };
    let node = state.gateway.selector().active().unwrap_or_else(|| "none".to_string());
    match result {
        Ok(response) => {
            metrics::record_request(method.as_str(), response.status.as_u16(), &node, start_time);
            response.into_response()
        }
        Err(e) => {
            tracing::error!(path = %descriptor.path, error = %e, "Forwarding failed");
            let response = e.into_response();
            metrics::record_request(method.as_str(), response.status().as_u16(), &node, start_time);
            response
        }
    }
}

/// Bodies without a declared length are only caught while buffering.
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

async fn not_found(uri: Uri) -> GatewayError {
    GatewayError::NotFound(uri.path().to_string())
}

//! Administrative endpoints, answered locally and never proxied.
//!
//! - `GET  <prefix>/node-status[?refresh=true]`
//! - `POST <prefix>/add-node` `{"nodeUrl": "..."}` (bearer token if configured)

pub mod handlers;
pub mod auth;

use axum::{
    routing::{get, post},
    Router,
    middleware,
};
use crate::http::server::AppState;
use self::handlers::*;
use self::auth::admin_auth_middleware;

pub fn setup_admin_router(state: AppState, api_prefix: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{api_prefix}/node-status"), get(node_status))
        .route(
            &format!("{api_prefix}/add-node"),
            post(add_node).layer(middleware::from_fn_with_state(state, admin_auth_middleware)),
        )
}

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::gateway::GatewayStatus;
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Run a fresh selection scan before reporting.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNodeRequest {
    #[serde(default)]
    pub node_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNodeResponse {
    pub success: bool,
    pub added: String,
    pub known_nodes: Vec<String>,
}

pub async fn node_status(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<GatewayStatus>, GatewayError> {
    let Query(query) = query.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    if query.refresh {
        let deadline = state.config.timeouts.request();
        if tokio::time::timeout(deadline, state.gateway.select_active()).await.is_err() {
            return Err(state.gateway.timed_out(deadline));
        }
    }
    Ok(Json(state.gateway.status()))
}

pub async fn add_node(
    State(state): State<AppState>,
    payload: Result<Json<AddNodeRequest>, JsonRejection>,
) -> Result<Json<AddNodeResponse>, GatewayError> {
    let Json(payload) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let known_nodes = state.gateway.register(&payload.node_url)?;
    Ok(Json(AddNodeResponse {
        success: true,
        added: payload.node_url.trim().to_string(),
        known_nodes,
    }))
}

//! Liveness and pool counters.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use pooltask_pool::PoolStats;
use serde::Serialize;

use crate::state::AppState;

pub async fn home() -> &'static str {
    "pooltask: ready\n"
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub pool: PoolStats,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        pool: state.pool.stats(),
    })
}

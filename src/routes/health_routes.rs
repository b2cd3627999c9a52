use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub primary_enabled: bool,
    pub geocode_cache: CacheStats,
    pub route_cache: CacheStats,
}

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.cache.stats().await;
    Json(HealthResponse {
        status: "ok",
        primary_enabled: state.config.primary_available(),
        geocode_cache: stats.geocode_cache,
        route_cache: stats.route_cache,
    })
}

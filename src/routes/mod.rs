pub mod fee_routes;
pub mod health_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", fee_routes::create_fee_router())
        .merge(health_routes::create_health_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir que el
//! checkout llame a la API desde cualquier origen.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Cualquier origen, solo POST/OPTIONS y Content-Type
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

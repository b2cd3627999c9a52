//! Sistema de manejo de errores
//!
//! Este módulo define los errores de la aplicación y su conversión a
//! respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::resolution_pipeline::ResolutionError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Route resolution failed: {message}")]
    ResolutionFailed { message: String, trace: Vec<String> },
}

impl From<ResolutionError> for AppError {
    fn from(error: ResolutionError) -> Self {
        match error {
            ResolutionError::Config(e) => AppError::Config(e.to_string()),
            ResolutionError::Failed { last, trace } => AppError::ResolutionFailed {
                message: last.to_string(),
                trace: trace.into_steps(),
            },
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    status: &'static str,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                log::warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        status: "ERROR",
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: "VALIDATION_ERROR",
                    },
                )
            }

            AppError::BadRequest(msg) => {
                log::warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        status: "ERROR",
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: "BAD_REQUEST",
                    },
                )
            }

            AppError::Config(msg) => {
                log::error!("❌ Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        status: "ERROR",
                        error: "Configuration Error".to_string(),
                        message: msg,
                        details: None,
                        code: "CONFIG_ERROR",
                    },
                )
            }

            AppError::ResolutionFailed { message, trace } => {
                log::error!("❌ Route resolution failed: {} (trace: {:?})", message, trace);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        status: "ERROR",
                        error: "Resolution Failed".to_string(),
                        message: "Could not resolve a route to the destination".to_string(),
                        details: Some(json!({ "provider_error": message, "trace": trace })),
                        code: "RESOLUTION_FAILED",
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de configuración
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::Config(message.into())
}

//! Contrato común de proveedores de geocodificación y ruteo

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::models::{Coordinate, RouteResult, TransportProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Falta una credencial o un ajuste obligatorio
    Config,
    /// Respuesta no exitosa, error de red o timeout
    Transport,
    /// Respuesta exitosa sin coordenadas/distancia/duración utilizables
    EmptyResult,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderErrorKind::Config => "config",
            ProviderErrorKind::Transport => "transport",
            ProviderErrorKind::EmptyResult => "empty_result",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} {kind} error{}: {message}", .http_status.map(|s| format!(" ({})", s)).unwrap_or_default())]
pub struct ProviderError {
    pub provider: String,
    pub kind: ProviderErrorKind,
    pub http_status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn config(provider: &str, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            kind: ProviderErrorKind::Config,
            http_status: None,
            message: message.into(),
        }
    }

    pub fn transport(provider: &str, http_status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            kind: ProviderErrorKind::Transport,
            http_status,
            message: message.into(),
        }
    }

    pub fn empty(provider: &str, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            kind: ProviderErrorKind::EmptyResult,
            http_status: None,
            message: message.into(),
        }
    }

    /// Convertir un error de reqwest (red, timeout, cuerpo ilegible)
    pub fn from_reqwest(provider: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else {
            error.to_string()
        };
        Self::transport(provider, error.status().map(|s| s.as_u16()), message)
    }

    pub fn is_config(&self) -> bool {
        self.kind == ProviderErrorKind::Config
    }

    /// Motivo corto para la traza de intentos, ej. `transport_503`
    pub fn reason(&self) -> String {
        match self.http_status {
            Some(status) => format!("{}_{}", self.kind, status),
            None => self.kind.to_string(),
        }
    }
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn geocode(&self, address: &str) -> Result<Coordinate, ProviderError>;
}

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TransportProfile,
    ) -> Result<RouteResult, ProviderError>;
}

/// Leer el cuerpo de una respuesta no exitosa como `Transport`
pub(crate) async fn transport_failure(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::error!("❌ {} failed with status {}: {}", provider, status, body);
    ProviderError::transport(provider, Some(status.as_u16()), body)
}

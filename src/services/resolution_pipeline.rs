//! Pipeline de resolución geocodificación + ruteo
//!
//! Recorre una lista ordenada de tiers (primario, gratuito, estimación) y se
//! detiene en el primer éxito completo. Los errores de transporte o de
//! resultado vacío pasan al siguiente tier; un error de configuración se
//! propaga de inmediato. La traza de intentos es solo diagnóstico.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::clients::provider::{GeocodingProvider, ProviderError, RoutingProvider};
use crate::models::{Coordinate, RouteResult, TransportProfile};
use crate::services::great_circle;

/// Secuencia ordenada de pasos: `try:X`, `X_fail:<motivo>`, `fallback:Y`, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttemptTrace(Vec<String>);

impl AttemptTrace {
    pub fn push(&mut self, step: impl Into<String>) {
        self.0.push(step.into());
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }

    pub fn into_steps(self) -> Vec<String> {
        self.0
    }

    pub fn position(&self, step: &str) -> Option<usize> {
        self.0.iter().position(|s| s == step)
    }

    pub fn contains(&self, step: &str) -> bool {
        self.position(step).is_some()
    }
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("resolution configuration error: {0}")]
    Config(ProviderError),

    #[error("all resolution tiers failed, last error: {last}")]
    Failed {
        last: ProviderError,
        trace: AttemptTrace,
    },
}

/// Origen de la ruta
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    Fixed(Coordinate),
    /// Se geocodifica (con caché) en cada resolución
    Address(String),
}

/// Estado compartido entre tiers durante una resolución
pub struct ResolutionContext<'a> {
    pub origin: Coordinate,
    pub destination_address: &'a str,
    pub destination: Option<Coordinate>,
    pub profile: TransportProfile,
    pub trace: AttemptTrace,
}

impl ResolutionContext<'_> {
    /// Reutilizar el destino ya resuelto por un tier anterior, o geocodificarlo
    async fn destination_with(
        &mut self,
        tier: &str,
        geocoder: &dyn GeocodingProvider,
    ) -> Result<Coordinate, ProviderError> {
        if let Some(destination) = self.destination {
            self.trace.push(format!("{}_reuse_destination", tier));
            return Ok(destination);
        }

        let destination = geocoder.geocode(self.destination_address).await?;
        self.destination = Some(destination);
        Ok(destination)
    }
}

#[async_trait]
pub trait ResolutionTier: Send + Sync {
    fn name(&self) -> &str;

    /// `Err(motivo)` si el tier está deshabilitado
    fn availability(&self) -> Result<(), String> {
        Ok(())
    }

    fn is_estimate(&self) -> bool {
        false
    }

    async fn attempt(&self, ctx: &mut ResolutionContext<'_>) -> Result<RouteResult, ProviderError>;
}

/// Tier con geocodificador + router de red
pub struct RoutedTier {
    name: String,
    geocoder: Arc<dyn GeocodingProvider>,
    router: Arc<dyn RoutingProvider>,
    disabled_reason: Option<String>,
}

impl RoutedTier {
    pub fn new(
        name: &str,
        geocoder: Arc<dyn GeocodingProvider>,
        router: Arc<dyn RoutingProvider>,
    ) -> Self {
        Self {
            name: name.to_string(),
            geocoder,
            router,
            disabled_reason: None,
        }
    }

    pub fn disabled(mut self, reason: impl Into<String>) -> Self {
        self.disabled_reason = Some(reason.into());
        self
    }
}

#[async_trait]
impl ResolutionTier for RoutedTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn availability(&self) -> Result<(), String> {
        match &self.disabled_reason {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }

    async fn attempt(&self, ctx: &mut ResolutionContext<'_>) -> Result<RouteResult, ProviderError> {
        let destination = ctx.destination_with(&self.name, self.geocoder.as_ref()).await?;
        self.router.route(ctx.origin, destination, ctx.profile).await
    }
}

/// Último tier: geocodifica si hace falta y estima por círculo máximo
pub struct EstimateTier {
    name: String,
    geocoder: Arc<dyn GeocodingProvider>,
}

impl EstimateTier {
    pub fn new(name: &str, geocoder: Arc<dyn GeocodingProvider>) -> Self {
        Self {
            name: name.to_string(),
            geocoder,
        }
    }
}

#[async_trait]
impl ResolutionTier for EstimateTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_estimate(&self) -> bool {
        true
    }

    async fn attempt(&self, ctx: &mut ResolutionContext<'_>) -> Result<RouteResult, ProviderError> {
        let destination = ctx.destination_with(&self.name, self.geocoder.as_ref()).await?;
        Ok(great_circle::estimate(ctx.origin, destination))
    }
}

/// Resultado de una resolución exitosa
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub route: RouteResult,
    pub origin: Coordinate,
    pub destination: Option<Coordinate>,
    pub resolved_by: String,
    pub estimated: bool,
    pub trace: AttemptTrace,
}

pub struct ResolutionPipeline {
    origin: Origin,
    profile: TransportProfile,
    tiers: Vec<Box<dyn ResolutionTier>>,
    origin_geocoders: Vec<Arc<dyn GeocodingProvider>>,
}

impl ResolutionPipeline {
    pub fn new(
        origin: Origin,
        profile: TransportProfile,
        tiers: Vec<Box<dyn ResolutionTier>>,
        origin_geocoders: Vec<Arc<dyn GeocodingProvider>>,
    ) -> Self {
        Self {
            origin,
            profile,
            tiers,
            origin_geocoders,
        }
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|tier| tier.name()).collect()
    }

    pub async fn resolve(&self, destination_address: &str) -> Result<Resolution, ResolutionError> {
        let mut trace = AttemptTrace::default();
        let origin = self.resolve_origin(&mut trace).await?;

        let mut ctx = ResolutionContext {
            origin,
            destination_address,
            destination: None,
            profile: self.profile,
            trace,
        };
        let mut last_error: Option<ProviderError> = None;

        for tier in &self.tiers {
            if let Err(reason) = tier.availability() {
                ctx.trace.push(format!("skip:{}({})", tier.name(), reason));
                continue;
            }
            if last_error.is_some() {
                ctx.trace.push(format!("fallback:{}", tier.name()));
            }
            ctx.trace.push(format!("try:{}", tier.name()));

            match tier.attempt(&mut ctx).await {
                Ok(route) => {
                    ctx.trace.push(format!("{}_ok", tier.name()));
                    log::info!(
                        "🧭 Resolved '{}' via {}: {:.2} km / {} min",
                        destination_address,
                        tier.name(),
                        route.distance_km,
                        route.duration_min
                    );
                    return Ok(Resolution {
                        route,
                        origin: ctx.origin,
                        destination: ctx.destination,
                        resolved_by: tier.name().to_string(),
                        estimated: tier.is_estimate(),
                        trace: ctx.trace,
                    });
                }
                Err(error) => {
                    ctx.trace.push(format!("{}_fail:{}", tier.name(), error.reason()));
                    if error.is_config() {
                        log::error!("❌ Tier {} misconfigured: {}", tier.name(), error);
                        return Err(ResolutionError::Config(error));
                    }
                    log::warn!("⚠️ Tier {} failed, falling back: {}", tier.name(), error);
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(last) => Err(ResolutionError::Failed {
                last,
                trace: ctx.trace,
            }),
            None => Err(ResolutionError::Config(ProviderError::config(
                "pipeline",
                "no resolution tier is enabled",
            ))),
        }
    }

    async fn resolve_origin(&self, trace: &mut AttemptTrace) -> Result<Coordinate, ResolutionError> {
        let address = match &self.origin {
            Origin::Fixed(coordinate) => return Ok(*coordinate),
            Origin::Address(address) => address,
        };

        let mut last_error = None;
        for geocoder in &self.origin_geocoders {
            trace.push(format!("origin:try:{}", geocoder.name()));
            match geocoder.geocode(address).await {
                Ok(coordinate) => {
                    trace.push(format!("origin:{}_ok", geocoder.name()));
                    return Ok(coordinate);
                }
                Err(error) => {
                    trace.push(format!("origin:{}_fail:{}", geocoder.name(), error.reason()));
                    if error.is_config() {
                        return Err(ResolutionError::Config(error));
                    }
                    log::warn!("⚠️ Origin geocoding via {} failed: {}", geocoder.name(), error);
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(last) => Err(ResolutionError::Failed {
                last,
                trace: trace.clone(),
            }),
            None => Err(ResolutionError::Config(ProviderError::config(
                "pipeline",
                "origin address configured without any geocoder",
            ))),
        }
    }
}

//! Proveedores con caché de lectura
//!
//! Se consulta el cache antes de la llamada de red y se guarda solo tras un
//! éxito; un fallo nunca queda en cache.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::GeoCache;
use crate::clients::provider::{GeocodingProvider, ProviderError, RoutingProvider};
use crate::models::{Coordinate, RouteResult, TransportProfile};

pub struct CachedGeocoder {
    inner: Arc<dyn GeocodingProvider>,
    cache: Arc<GeoCache>,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn GeocodingProvider>, cache: Arc<GeoCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl GeocodingProvider for CachedGeocoder {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn geocode(&self, address: &str) -> Result<Coordinate, ProviderError> {
        let key = GeoCache::geocode_key(self.inner.name(), address);
        if let Some(coordinate) = self.cache.get_geocode(&key).await {
            log::info!("💾 [{}] Geocode cache hit: {}", self.inner.name(), address);
            return Ok(coordinate);
        }

        let coordinate = self.inner.geocode(address).await?;
        Ok(self.cache.put_geocode(&key, coordinate).await)
    }
}

pub struct CachedRouter {
    inner: Arc<dyn RoutingProvider>,
    cache: Arc<GeoCache>,
}

impl CachedRouter {
    pub fn new(inner: Arc<dyn RoutingProvider>, cache: Arc<GeoCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl RoutingProvider for CachedRouter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TransportProfile,
    ) -> Result<RouteResult, ProviderError> {
        let key = GeoCache::route_key(self.inner.name(), profile, origin, destination);
        if let Some(route) = self.cache.get_route(&key).await {
            log::info!("💾 [{}] Route cache hit: {} -> {}", self.inner.name(), origin, destination);
            return Ok(route);
        }

        let route = self.inner.route(origin, destination, profile).await?;
        Ok(self.cache.put_route(&key, route).await)
    }
}

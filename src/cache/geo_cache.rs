//! Caches de geocodificación y ruteo
//!
//! Un único servicio compartido entre proveedores. Las claves incluyen el
//! nombre del proveedor para no mezclar resultados entre servicios.

use serde::Serialize;
use std::sync::Arc;

use crate::cache::cache_config::CacheConfig;
use crate::cache::ttl_cache::{CacheStats, Clock, SystemClock, TtlCache};
use crate::models::{Coordinate, RouteResult, TransportProfile};

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoCacheStats {
    pub geocode_cache: CacheStats,
    pub route_cache: CacheStats,
}

pub struct GeoCache {
    geocodes: TtlCache<Coordinate>,
    routes: TtlCache<RouteResult>,
}

impl GeoCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            geocodes: TtlCache::new("geocode", config.geocode_ttl(), clock.clone()),
            routes: TtlCache::new("route", config.route_ttl(), clock),
        }
    }

    pub fn geocode_key(provider: &str, address: &str) -> String {
        format!("geo:{}:{}", provider, address.trim().to_lowercase())
    }

    pub fn route_key(
        provider: &str,
        profile: TransportProfile,
        origin: Coordinate,
        destination: Coordinate,
    ) -> String {
        format!(
            "route:{}:{}:{}:{}",
            provider,
            profile,
            origin.cache_fragment(),
            destination.cache_fragment()
        )
    }

    pub async fn get_geocode(&self, key: &str) -> Option<Coordinate> {
        self.geocodes.get(key).await
    }

    pub async fn put_geocode(&self, key: &str, coordinate: Coordinate) -> Coordinate {
        self.geocodes.put(key, coordinate).await
    }

    pub async fn get_route(&self, key: &str) -> Option<RouteResult> {
        self.routes.get(key).await
    }

    pub async fn put_route(&self, key: &str, route: RouteResult) -> RouteResult {
        self.routes.put(key, route).await
    }

    pub async fn stats(&self) -> GeoCacheStats {
        GeoCacheStats {
            geocode_cache: self.geocodes.stats().await,
            route_cache: self.routes.stats().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ttl_cache::ManualClock;
    use chrono::{Duration, Utc};

    #[test]
    fn test_geocode_key_is_case_insensitive() {
        assert_eq!(
            GeoCache::geocode_key("osm", "  Rua X, Canoas "),
            GeoCache::geocode_key("osm", "rua x, canoas")
        );
        assert_ne!(
            GeoCache::geocode_key("osm", "rua x"),
            GeoCache::geocode_key("ors", "rua x")
        );
    }

    #[test]
    fn test_route_key_includes_profile() {
        let a = Coordinate::new(-30.0, -51.0);
        let b = Coordinate::new(-29.9, -51.1);
        assert_ne!(
            GeoCache::route_key("osm", TransportProfile::Driving, a, b),
            GeoCache::route_key("osm", TransportProfile::Walking, a, b)
        );
    }

    #[tokio::test]
    async fn test_route_ttl_is_shorter_than_geocode_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = GeoCache::with_clock(&CacheConfig::default(), clock.clone());
        let a = Coordinate::new(-30.0, -51.0);

        cache.put_geocode("g", a).await;
        cache.put_route("r", RouteResult::new(2.0, 10.0)).await;
        clock.advance(Duration::minutes(20));

        assert_eq!(cache.get_geocode("g").await, Some(a));
        assert_eq!(cache.get_route("r").await, None);
    }
}

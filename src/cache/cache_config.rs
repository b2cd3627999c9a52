//! Configuración de cache
//!
//! Este módulo contiene la configuración de TTL para los caches en memoria.

use serde::{Deserialize, Serialize};

/// TTL máximo aceptado: 30 días
pub const MAX_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub geocode_ttl_secs: u64,
    pub route_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geocode_ttl_secs: 30 * 60, // coordenadas casi no cambian
            route_ttl_secs: 15 * 60,   // sensible al tráfico
        }
    }
}

impl CacheConfig {
    pub fn geocode_ttl(&self) -> chrono::Duration {
        ttl_duration(self.geocode_ttl_secs)
    }

    pub fn route_ttl(&self) -> chrono::Duration {
        ttl_duration(self.route_ttl_secs)
    }
}

fn ttl_duration(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}

//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: proveedores, origen de
//! la tienda, nivel de isenção y TTLs de cache.

use std::env;
use std::time::Duration;

use crate::cache::cache_config::{CacheConfig, MAX_TTL_SECS};
use crate::models::{Coordinate, TransportProfile, WaiverPolicy};
use crate::services::address_normalizer::HomeRegion;
use crate::services::resolution_pipeline::Origin;
use crate::utils::errors::{config_error, AppResult};

/// Centro de Porto Alegre
pub const DEFAULT_ORIGIN: Coordinate = Coordinate {
    latitude: -30.0346,
    longitude: -51.2177,
};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub primary_enabled: bool,
    pub ors_api_key: Option<String>,
    pub ors_base_url: String,
    pub nominatim_base_url: String,
    pub nominatim_user_agent: String,
    pub osrm_base_url: String,
    pub transport_profile: TransportProfile,
    pub origin: Origin,
    pub waiver_level: u8,
    pub provider_timeout: Duration,
    pub cache: CacheConfig,
    pub home_region: HomeRegion,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            primary_enabled: true,
            ors_api_key: None,
            ors_base_url: "https://api.openrouteservice.org".to_string(),
            nominatim_base_url: "https://nominatim.openstreetmap.org".to_string(),
            nominatim_user_agent: "delivery-fee/0.1".to_string(),
            osrm_base_url: "https://router.project-osrm.org".to_string(),
            transport_profile: TransportProfile::Driving,
            origin: Origin::Fixed(DEFAULT_ORIGIN),
            waiver_level: 1,
            provider_timeout: Duration::from_secs(10),
            cache: CacheConfig::default(),
            home_region: HomeRegion::default(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| config_error(format!("{} must be a valid number, got '{}'", name, value)))
}

fn parse_ttl(name: &str, value: &str) -> AppResult<u64> {
    let secs: u64 = parse_number(name, value)?;
    if secs > MAX_TTL_SECS {
        return Err(config_error(format!(
            "{} must be at most {} seconds, got {}",
            name, MAX_TTL_SECS, secs
        )));
    }
    Ok(secs)
}

impl EnvironmentConfig {
    /// Cargar desde variables de entorno, con valores por defecto
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Cargar desde una función de búsqueda arbitraria; vacíos cuentan como ausentes
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(environment) = var("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(port) = var("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.log_level = level;
        }

        config.primary_enabled = match var("USE_PROVIDER").map(|p| p.to_lowercase()).as_deref() {
            None | Some("ors") => true,
            Some("osm") => false,
            Some(other) => {
                return Err(config_error(format!(
                    "USE_PROVIDER must be 'ors' or 'osm', got '{}'",
                    other
                )))
            }
        };
        config.ors_api_key = var("ORS_API_KEY");
        if let Some(url) = var("ORS_BASE_URL") {
            config.ors_base_url = url;
        }
        if let Some(url) = var("NOMINATIM_BASE_URL") {
            config.nominatim_base_url = url;
        }
        if let Some(agent) = var("NOMINATIM_USER_AGENT") {
            config.nominatim_user_agent = agent;
        }
        if let Some(url) = var("OSRM_BASE_URL") {
            config.osrm_base_url = url;
        }
        if let Some(profile) = var("TRANSPORT_PROFILE") {
            config.transport_profile = profile
                .parse()
                .map_err(|e| config_error(format!("TRANSPORT_PROFILE: {}", e)))?;
        }

        config.origin = match (var("ORIGIN_LAT"), var("ORIGIN_LNG"), var("ORIGIN_ADDRESS")) {
            (Some(lat), Some(lng), _) => {
                let origin = Coordinate::new(
                    parse_number("ORIGIN_LAT", &lat)?,
                    parse_number("ORIGIN_LNG", &lng)?,
                );
                if !(-90.0..=90.0).contains(&origin.latitude)
                    || !(-180.0..=180.0).contains(&origin.longitude)
                {
                    return Err(config_error(format!("origin {} is out of range", origin)));
                }
                Origin::Fixed(origin)
            }
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(config_error(
                    "ORIGIN_LAT and ORIGIN_LNG must be set together",
                ))
            }
            (None, None, Some(address)) => Origin::Address(address),
            (None, None, None) => Origin::Fixed(DEFAULT_ORIGIN),
        };

        if let Some(level) = var("WAIVER_LEVEL").or_else(|| var("ISENCAO_NIVEL")) {
            config.waiver_level = parse_number("WAIVER_LEVEL", &level)?;
        }
        if !WaiverPolicy::default().has_level(config.waiver_level) {
            return Err(config_error(format!(
                "waiver level must be between {} and {}, got {}",
                WaiverPolicy::MIN_LEVEL,
                WaiverPolicy::MAX_LEVEL,
                config.waiver_level
            )));
        }

        if let Some(secs) = var("PROVIDER_TIMEOUT_SECS") {
            let secs: u64 = parse_number("PROVIDER_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(config_error("PROVIDER_TIMEOUT_SECS must be greater than zero"));
            }
            config.provider_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = var("GEOCODE_CACHE_TTL_SECS") {
            config.cache.geocode_ttl_secs = parse_ttl("GEOCODE_CACHE_TTL_SECS", &secs)?;
        }
        if let Some(secs) = var("ROUTE_CACHE_TTL_SECS") {
            config.cache.route_ttl_secs = parse_ttl("ROUTE_CACHE_TTL_SECS", &secs)?;
        }

        Ok(config)
    }

    /// El proveedor primario solo participa con credencial
    pub fn primary_available(&self) -> bool {
        self.primary_enabled && self.ors_api_key.is_some()
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

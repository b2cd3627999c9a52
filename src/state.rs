//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, y arma la cadena de proveedores.

use reqwest::Client;
use std::sync::Arc;

use crate::cache::GeoCache;
use crate::clients::{
    CachedGeocoder, CachedRouter, GeocodingProvider, NominatimClient, OrsClient, OsrmClient,
    RoutingProvider,
};
use crate::config::environment::EnvironmentConfig;
use crate::services::{
    AddressNormalizer, EstimateTier, FeeCalculationService, PricingEngine, ResolutionPipeline,
    ResolutionTier, RoutedTier,
};
use crate::utils::errors::{config_error, AppResult};

pub const PRIMARY_TIER: &str = "ors";
pub const SECONDARY_TIER: &str = "osm";
pub const ESTIMATE_TIER: &str = "estimate";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub cache: Arc<GeoCache>,
    pub fee_service: Arc<FeeCalculationService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let cache = Arc::new(GeoCache::new(&config.cache));
        Self::with_cache(config, cache)
    }

    pub fn with_cache(config: EnvironmentConfig, cache: Arc<GeoCache>) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .map_err(|e| config_error(format!("failed to build HTTP client: {}", e)))?;

        let ors = Arc::new(OrsClient::new(
            http_client.clone(),
            &config.ors_base_url,
            config.ors_api_key.clone(),
        ));
        let nominatim = Arc::new(NominatimClient::new(
            http_client.clone(),
            &config.nominatim_base_url,
            &config.nominatim_user_agent,
        ));
        let osrm = Arc::new(OsrmClient::new(http_client, &config.osrm_base_url));

        let ors_geocoder: Arc<dyn GeocodingProvider> =
            Arc::new(CachedGeocoder::new(ors.clone(), cache.clone()));
        let ors_router: Arc<dyn RoutingProvider> =
            Arc::new(CachedRouter::new(ors.clone(), cache.clone()));
        let free_geocoder: Arc<dyn GeocodingProvider> =
            Arc::new(CachedGeocoder::new(nominatim, cache.clone()));
        let free_router: Arc<dyn RoutingProvider> = Arc::new(CachedRouter::new(osrm, cache.clone()));

        let mut primary = RoutedTier::new(PRIMARY_TIER, ors_geocoder.clone(), ors_router);
        if !config.primary_enabled {
            primary = primary.disabled("disabled");
        } else if !ors.has_credentials() {
            primary = primary.disabled("no_key");
        }

        let tiers: Vec<Box<dyn ResolutionTier>> = vec![
            Box::new(primary),
            Box::new(RoutedTier::new(SECONDARY_TIER, free_geocoder.clone(), free_router)),
            Box::new(EstimateTier::new(ESTIMATE_TIER, free_geocoder.clone())),
        ];

        let mut origin_geocoders = Vec::new();
        if config.primary_available() {
            origin_geocoders.push(ors_geocoder);
        }
        origin_geocoders.push(free_geocoder);

        let pipeline = ResolutionPipeline::new(
            config.origin.clone(),
            config.transport_profile,
            tiers,
            origin_geocoders,
        );
        let normalizer = AddressNormalizer::new(config.home_region.clone())
            .map_err(|e| config_error(format!("invalid address patterns: {}", e)))?;

        log::info!(
            "🔧 Resolution chain: {:?} (primary available: {})",
            pipeline.tier_names(),
            config.primary_available()
        );

        let fee_service = FeeCalculationService::new(
            normalizer,
            pipeline,
            PricingEngine::default(),
            config.waiver_level,
        );

        Ok(Self {
            config: Arc::new(config),
            cache,
            fee_service: Arc::new(fee_service),
        })
    }
}

//! Cliente de Nominatim (geocodificación gratuita de OpenStreetMap)
//!
//! La política de uso exige un `User-Agent` que identifique la aplicación.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clients::provider::{transport_failure, GeocodingProvider, ProviderError};
use crate::models::Coordinate;

pub const NOMINATIM_PROVIDER: &str = "nominatim";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Option<String>,
    lon: Option<String>,
}

impl NominatimPlace {
    fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.as_deref()?.trim().parse::<f64>().ok()?;
        let lon = self.lon.as_deref()?.trim().parse::<f64>().ok()?;
        (lat.is_finite() && lon.is_finite()).then(|| Coordinate::new(lat, lon))
    }
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(client: Client, base_url: &str, user_agent: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.trim().to_string(),
        }
    }
}

#[async_trait]
impl GeocodingProvider for NominatimClient {
    fn name(&self) -> &str {
        NOMINATIM_PROVIDER
    }

    async fn geocode(&self, address: &str) -> Result<Coordinate, ProviderError> {
        if self.user_agent.is_empty() {
            return Err(ProviderError::config(
                NOMINATIM_PROVIDER,
                "NOMINATIM_USER_AGENT must identify the application",
            ));
        }

        log::info!("🗺️ [nominatim] Geocoding address: {}", address);

        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(address)
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .header("Accept-Language", "pt-BR")
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(NOMINATIM_PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(transport_failure(NOMINATIM_PROVIDER, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(NOMINATIM_PROVIDER, e))?;
        let places: Vec<NominatimPlace> = serde_json::from_str(&body).map_err(|e| {
            ProviderError::empty(NOMINATIM_PROVIDER, format!("malformed response: {}", e))
        })?;

        let coordinate = places
            .first()
            .and_then(NominatimPlace::coordinate)
            .ok_or_else(|| ProviderError::empty(NOMINATIM_PROVIDER, "no search match"))?;

        log::info!("✅ [nominatim] Geocoding successful: {} -> {}", address, coordinate);
        Ok(coordinate)
    }
}

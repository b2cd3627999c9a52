//! Cliente de openrouteservice (proveedor primario)
//!
//! Geocodificación vía `/geocode/search` y ruteo vía
//! `/v2/directions/{profile}/geojson`. Requiere `ORS_API_KEY`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::clients::provider::{
    transport_failure, GeocodingProvider, ProviderError, RoutingProvider,
};
use crate::models::{Coordinate, RouteResult, TransportProfile};

pub const ORS_PROVIDER: &str = "ors";

#[derive(Debug, Deserialize)]
struct OrsFeatureCollection {
    #[serde(default)]
    features: Vec<OrsFeature>,
}

#[derive(Debug, Deserialize)]
struct OrsFeature {
    geometry: Option<OrsGeometry>,
    properties: Option<OrsRouteProperties>,
}

#[derive(Debug, Deserialize)]
struct OrsGeometry {
    #[serde(default)]
    coordinates: serde_json::Value, // [lng, lat] en geocode, lista de puntos en rutas
}

#[derive(Debug, Deserialize)]
struct OrsRouteProperties {
    #[serde(default)]
    segments: Vec<OrsSegment>,
}

#[derive(Debug, Deserialize)]
struct OrsSegment {
    distance: Option<f64>, // metros
    duration: Option<f64>, // segundos
}

pub struct OrsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OrsClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::config(ORS_PROVIDER, "ORS_API_KEY is not configured"))
    }

    async fn read_collection(
        &self,
        response: reqwest::Response,
    ) -> Result<OrsFeatureCollection, ProviderError> {
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(ORS_PROVIDER, e))?;
        serde_json::from_str(&body).map_err(|e| {
            ProviderError::empty(ORS_PROVIDER, format!("malformed response: {}", e))
        })
    }
}

#[async_trait]
impl GeocodingProvider for OrsClient {
    fn name(&self) -> &str {
        ORS_PROVIDER
    }

    async fn geocode(&self, address: &str) -> Result<Coordinate, ProviderError> {
        let key = self.api_key()?;
        log::info!("🗺️ [ors] Geocoding address: {}", address);

        let url = format!(
            "{}/geocode/search?text={}&size=1&lang=pt",
            self.base_url,
            urlencoding::encode(address)
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", key)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(ORS_PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(transport_failure(ORS_PROVIDER, response).await);
        }

        let collection = self.read_collection(response).await?;
        let coordinate = collection
            .features
            .first()
            .and_then(|feature| feature.geometry.as_ref())
            .and_then(|geometry| serde_json::from_value::<Vec<f64>>(geometry.coordinates.clone()).ok())
            .and_then(|pair| Coordinate::from_lng_lat(&pair))
            .ok_or_else(|| ProviderError::empty(ORS_PROVIDER, "no geocoding result"))?;

        log::info!("✅ [ors] Geocoding successful: {} -> {}", address, coordinate);
        Ok(coordinate)
    }
}

#[async_trait]
impl RoutingProvider for OrsClient {
    fn name(&self) -> &str {
        ORS_PROVIDER
    }

    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TransportProfile,
    ) -> Result<RouteResult, ProviderError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.base_url,
            profile.ors_name()
        );
        let body = json!({
            "coordinates": [
                [origin.longitude, origin.latitude],
                [destination.longitude, destination.latitude]
            ],
            "language": "pt"
        });

        log::info!("🚚 [ors] Routing {} -> {} ({})", origin, destination, profile);

        let response = self
            .client
            .post(&url)
            .header("Authorization", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(ORS_PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(transport_failure(ORS_PROVIDER, response).await);
        }

        let collection = self.read_collection(response).await?;
        let segment = collection
            .features
            .first()
            .and_then(|feature| feature.properties.as_ref())
            .and_then(|properties| properties.segments.first())
            .ok_or_else(|| ProviderError::empty(ORS_PROVIDER, "route has no segments"))?;

        match (segment.distance, segment.duration) {
            (Some(meters), Some(seconds)) => {
                let route = RouteResult::from_meters_seconds(meters, seconds);
                log::info!(
                    "✅ [ors] Route: {:.2} km / {} min",
                    route.distance_km,
                    route.duration_min
                );
                Ok(route)
            }
            _ => Err(ProviderError::empty(
                ORS_PROVIDER,
                "route segment without distance/duration",
            )),
        }
    }
}

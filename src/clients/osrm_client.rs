//! Cliente de OSRM (ruteo gratuito)
//!
//! Las coordenadas van en orden longitud,latitud. Se pide una sola ruta, sin
//! alternativas ni geometría, para minimizar el payload.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::clients::provider::{transport_failure, ProviderError, RoutingProvider};
use crate::models::{Coordinate, RouteResult, TransportProfile};

pub const OSRM_PROVIDER: &str = "osrm";

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: Option<f64>, // metros
    duration: Option<f64>, // segundos
}

pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate, profile: TransportProfile) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false&alternatives=false&steps=false",
            self.base_url,
            profile.osrm_name(),
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    fn name(&self) -> &str {
        OSRM_PROVIDER
    }

    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TransportProfile,
    ) -> Result<RouteResult, ProviderError> {
        let url = self.route_url(origin, destination, profile);
        log::info!("🚚 [osrm] Routing {} -> {} ({})", origin, destination, profile.osrm_name());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(OSRM_PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(transport_failure(OSRM_PROVIDER, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(OSRM_PROVIDER, e))?;
        let parsed: OsrmRouteResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::empty(OSRM_PROVIDER, format!("malformed response: {}", e))
        })?;

        if parsed.code.as_deref() != Some("Ok") {
            return Err(ProviderError::empty(
                OSRM_PROVIDER,
                format!(
                    "routing code {}: {}",
                    parsed.code.as_deref().unwrap_or("missing"),
                    parsed.message.unwrap_or_default()
                ),
            ));
        }

        match parsed.routes.first().map(|r| (r.distance, r.duration)) {
            Some((Some(meters), Some(seconds))) => {
                let route = RouteResult::from_meters_seconds(meters, seconds);
                log::info!(
                    "✅ [osrm] Route: {:.2} km / {} min",
                    route.distance_km,
                    route.duration_min
                );
                Ok(route)
            }
            _ => Err(ProviderError::empty(OSRM_PROVIDER, "no route with distance/duration")),
        }
    }
}

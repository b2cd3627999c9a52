//! Clients - HTTP Clients for External APIs
//!
//! This module contains the geocoding and routing adapters and their
//! read-through cache wrappers.

pub mod cached;
pub mod nominatim_client;
pub mod ors_client;
pub mod osrm_client;
pub mod provider;

// Re-export main types for convenience
pub use cached::{CachedGeocoder, CachedRouter};
pub use nominatim_client::NominatimClient;
pub use ors_client::OrsClient;
pub use osrm_client::OsrmClient;
pub use provider::{GeocodingProvider, ProviderError, ProviderErrorKind, RoutingProvider};

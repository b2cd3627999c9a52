//! Cache
//!
//! Este módulo contiene los caches en memoria de geocodificación y ruteo.

pub mod cache_config;
pub mod geo_cache;
pub mod ttl_cache;

pub use cache_config::CacheConfig;
pub use geo_cache::{GeoCache, GeoCacheStats};
pub use ttl_cache::{CacheStats, Clock, ManualClock, SystemClock, TtlCache};

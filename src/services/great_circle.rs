//! Estimación por distancia de círculo máximo
//!
//! Último recurso cuando no hay ruta calculada: no hace I/O y no falla.

use crate::models::{Coordinate, RouteResult};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minutos por km a ~22 km/h de velocidad urbana media
const MINUTES_PER_KM: f64 = 2.73;
/// Carga y despacho
const FIXED_OVERHEAD_MIN: f64 = 5.0;

/// Distancia haversine en km
pub fn haversine_km(origin: Coordinate, destination: Coordinate) -> f64 {
    let lat1 = origin.latitude.to_radians();
    let lat2 = destination.latitude.to_radians();
    let d_lat = (destination.latitude - origin.latitude).to_radians();
    let d_lng = (destination.longitude - origin.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn estimate(origin: Coordinate, destination: Coordinate) -> RouteResult {
    let distance_km = haversine_km(origin, destination);
    let duration_min = (distance_km * MINUTES_PER_KM + FIXED_OVERHEAD_MIN).round().max(1.0);
    RouteResult::new(distance_km, duration_min)
}

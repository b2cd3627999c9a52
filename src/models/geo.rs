//! Tipos geográficos
//!
//! Coordenadas, resultados de ruta y perfiles de transporte compartidos por
//! los proveedores y el pipeline de resolución.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Punto geográfico resuelto (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Construir desde un par `[lng, lat]` (orden GeoJSON)
    pub fn from_lng_lat(pair: &[f64]) -> Option<Self> {
        match pair {
            [lng, lat, ..] if lat.is_finite() && lng.is_finite() => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }

    /// Clave estable para caché (6 decimales ≈ 10 cm)
    pub fn cache_fragment(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Distancia y duración de una ruta
///
/// La duración nunca baja de un minuto: toda entrega toma al menos uno.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl RouteResult {
    pub fn new(distance_km: f64, duration_min: f64) -> Self {
        let distance_km = if distance_km.is_finite() && distance_km > 0.0 {
            distance_km
        } else {
            0.0
        };
        let duration_min = if duration_min.is_finite() {
            duration_min.ceil().max(1.0)
        } else {
            1.0
        };

        Self {
            distance_km,
            duration_min,
        }
    }

    /// Desde valores crudos de proveedor: metros y segundos
    pub fn from_meters_seconds(meters: f64, seconds: f64) -> Self {
        Self::new(meters / 1000.0, seconds / 60.0)
    }
}

/// Perfil de transporte usado para el ruteo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProfile {
    Driving,
    Cycling,
    Walking,
}

impl TransportProfile {
    /// Nombre del perfil en openrouteservice
    pub fn ors_name(&self) -> &'static str {
        match self {
            TransportProfile::Driving => "driving-car",
            TransportProfile::Cycling => "cycling-regular",
            TransportProfile::Walking => "foot-walking",
        }
    }

    /// Nombre del perfil en OSRM
    pub fn osrm_name(&self) -> &'static str {
        match self {
            TransportProfile::Driving => "driving",
            TransportProfile::Cycling => "bike",
            TransportProfile::Walking => "foot",
        }
    }
}

impl Default for TransportProfile {
    fn default() -> Self {
        TransportProfile::Driving
    }
}

impl fmt::Display for TransportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ors_name())
    }
}

impl FromStr for TransportProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "driving" | "driving-car" | "car" => Ok(TransportProfile::Driving),
            "cycling" | "cycling-regular" | "bike" => Ok(TransportProfile::Cycling),
            "walking" | "foot-walking" | "foot" => Ok(TransportProfile::Walking),
            other => Err(format!("unknown transport profile '{}'", other)),
        }
    }
}

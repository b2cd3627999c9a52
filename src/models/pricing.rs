//! Modelos de precificación
//!
//! Tabla de faixas de precio y política de isenção (waiver) por nivel.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Etiqueta usada cuando ninguna faixa cubre la distancia/duración
pub const OUT_OF_SERVICE_AREA: &str = "out of service area";

/// Regla de precio: se aplica si `km <= max_km` y `min <= max_min`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTier {
    pub max_km: f64,
    pub max_min: f64,
    pub fee: Decimal,
    pub label: String,
}

impl PriceTier {
    pub fn new(max_km: f64, max_min: f64, fee: Decimal, label: &str) -> Self {
        Self {
            max_km,
            max_min,
            fee,
            label: label.to_string(),
        }
    }

    pub fn covers(&self, distance_km: f64, duration_min: f64) -> bool {
        distance_km <= self.max_km && duration_min <= self.max_min
    }

    /// Tabla por defecto, intervalos semiabiertos `(anterior, max_km]`
    pub fn default_table() -> Vec<PriceTier> {
        vec![
            PriceTier::new(1.5, 10.0, Decimal::from(15), "0–1.5km / up to 10min"),
            PriceTier::new(3.0, 20.0, Decimal::from(20), "1.5–3.0km / up to 20min"),
            PriceTier::new(4.5, 30.0, Decimal::from(30), "3.0–4.5km / up to 30min"),
            PriceTier::new(7.0, 45.0, Decimal::from(40), "4.5–7.0km / up to 45min"),
            PriceTier::new(10.0, 60.0, Decimal::from(50), "7.0–10.0km / up to 60min"),
            PriceTier::new(15.0, 90.0, Decimal::from(60), "10.0–15.0km / up to 90min"),
        ]
    }
}

/// Resultado de aplicar la tabla
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub fee: Option<Decimal>,
    pub tier_label: String,
}

impl PriceQuote {
    pub fn out_of_area() -> Self {
        Self {
            fee: None,
            tier_label: OUT_OF_SERVICE_AREA.to_string(),
        }
    }

    pub fn is_out_of_area(&self) -> bool {
        self.fee.is_none()
    }
}

/// Niveles de isenção: nivel -> valor mínimo de itens (o `None` = sin isenção)
#[derive(Debug, Clone, PartialEq)]
pub struct WaiverPolicy {
    thresholds: BTreeMap<u8, Option<Decimal>>,
}

impl WaiverPolicy {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 7;

    pub fn new(thresholds: BTreeMap<u8, Option<Decimal>>) -> Self {
        Self { thresholds }
    }

    pub fn threshold_for(&self, level: u8) -> Option<Decimal> {
        self.thresholds.get(&level).copied().flatten()
    }

    pub fn has_level(&self, level: u8) -> bool {
        self.thresholds.contains_key(&level)
    }
}

impl Default for WaiverPolicy {
    fn default() -> Self {
        let thresholds = BTreeMap::from([
            (1, Some(Decimal::from(250))),
            (2, Some(Decimal::from(250))),
            (3, Some(Decimal::from(300))),
            (4, Some(Decimal::from(400))),
            (5, Some(Decimal::from(500))),
            (6, Some(Decimal::from(500))),
            (7, None),
        ]);
        Self { thresholds }
    }
}

/// Resultado de la isenção
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaiverOutcome {
    pub payable_fee: Option<Decimal>,
    pub waived: bool,
    pub threshold: Option<Decimal>,
    pub label: Option<String>,
}

//! Modelos del sistema
//!
//! Este módulo contiene los tipos de dominio: coordenadas, rutas,
//! faixas de precio y política de isenção.

pub mod geo;
pub mod pricing;

pub use geo::*;
pub use pricing::*;

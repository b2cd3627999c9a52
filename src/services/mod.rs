//! Services module
//!
//! Este módulo contiene la lógica de negocio: normalización de direcciones,
//! resolución de rutas con fallback, precificación y el cálculo de frete.

pub mod address_normalizer;
pub mod fee_calculation_service;
pub mod great_circle;
pub mod pricing_engine;
pub mod resolution_pipeline;

pub use address_normalizer::{AddressNormalizer, HomeRegion};
pub use fee_calculation_service::FeeCalculationService;
pub use pricing_engine::PricingEngine;
pub use resolution_pipeline::{
    AttemptTrace, EstimateTier, Origin, Resolution, ResolutionError, ResolutionPipeline,
    ResolutionTier, RoutedTier,
};

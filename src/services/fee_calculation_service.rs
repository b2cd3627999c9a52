//! Servicio de cálculo de frete
//!
//! Compone normalización, resolución de ruta, tabla de precios e isenção en
//! una sola operación request/response.

use validator::Validate;

use crate::dto::{FeeRequest, FeeResult, FeeStatus};
use crate::services::address_normalizer::AddressNormalizer;
use crate::services::pricing_engine::PricingEngine;
use crate::services::resolution_pipeline::ResolutionPipeline;
use crate::utils::errors::AppResult;

pub struct FeeCalculationService {
    normalizer: AddressNormalizer,
    pipeline: ResolutionPipeline,
    pricing: PricingEngine,
    waiver_level: u8,
}

impl FeeCalculationService {
    pub fn new(
        normalizer: AddressNormalizer,
        pipeline: ResolutionPipeline,
        pricing: PricingEngine,
        waiver_level: u8,
    ) -> Self {
        Self {
            normalizer,
            pipeline,
            pricing,
            waiver_level,
        }
    }

    pub async fn calculate(&self, request: &FeeRequest) -> AppResult<FeeResult> {
        request.validate()?;

        let normalized_address = self.normalizer.normalize(&request.destination_address);
        log::info!(
            "📦 Calculating delivery fee for '{}' (normalized: '{}')",
            request.destination_address,
            normalized_address
        );

        let resolution = self.pipeline.resolve(&normalized_address).await?;
        let route = resolution.route;
        let quote = self.pricing.price_for(route.distance_km, route.duration_min);

        let distance_km = (route.distance_km * 100.0).round() / 100.0;
        let duration_min = route.duration_min.round() as u32;

        if quote.is_out_of_area() {
            log::info!(
                "🚫 Out of service area: {:.2} km / {} min",
                route.distance_km,
                duration_min
            );
            return Ok(FeeResult {
                status: FeeStatus::OutOfArea,
                distance_km,
                duration_min,
                base_fee: None,
                payable_fee: None,
                waived: false,
                waiver_label: None,
                tier_label: quote.tier_label,
                normalized_address,
                resolved_by: resolution.resolved_by,
                estimated: resolution.estimated,
                trace: resolution.trace,
            });
        }

        let waiver = self
            .pricing
            .apply_waiver(quote.fee, request.order_item_total, self.waiver_level);

        log::info!(
            "💰 Fee: {:?} (payable {:?}, waived: {}, threshold: {:?}) tier '{}' via {}",
            quote.fee,
            waiver.payable_fee,
            waiver.waived,
            waiver.threshold,
            quote.tier_label,
            resolution.resolved_by
        );

        Ok(FeeResult {
            status: FeeStatus::Ok,
            distance_km,
            duration_min,
            base_fee: quote.fee,
            payable_fee: waiver.payable_fee,
            waived: waiver.waived,
            waiver_label: waiver.label,
            tier_label: quote.tier_label,
            normalized_address,
            resolved_by: resolution.resolved_by,
            estimated: resolution.estimated,
            trace: resolution.trace,
        })
    }
}

//! Motor de precificación
//!
//! Mapea (distancia, duración) a una faixa de precio y aplica la isenção por
//! valor del pedido. Todo es puro y determinista.

use rust_decimal::Decimal;

use crate::models::{PriceQuote, PriceTier, WaiverOutcome, WaiverPolicy};

pub struct PricingEngine {
    tiers: Vec<PriceTier>,
    waivers: WaiverPolicy,
}

impl PricingEngine {
    /// Las faixas se ordenan por `max_km` ascendente
    pub fn new(mut tiers: Vec<PriceTier>, waivers: WaiverPolicy) -> Self {
        tiers.sort_by(|a, b| a.max_km.total_cmp(&b.max_km));
        let engine = Self { tiers, waivers };
        if !engine.is_monotonic() {
            log::warn!("⚠️ Price table ceilings are not strictly increasing; first match wins");
        }
        engine
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    /// Techos estrictamente crecientes en distancia y duración
    pub fn is_monotonic(&self) -> bool {
        self.tiers
            .windows(2)
            .all(|pair| pair[0].max_km < pair[1].max_km && pair[0].max_min < pair[1].max_min)
    }

    pub fn price_for(&self, distance_km: f64, duration_min: f64) -> PriceQuote {
        self.tiers
            .iter()
            .find(|tier| tier.covers(distance_km, duration_min))
            .map(|tier| PriceQuote {
                fee: Some(tier.fee),
                tier_label: tier.label.clone(),
            })
            .unwrap_or_else(PriceQuote::out_of_area)
    }

    pub fn apply_waiver(
        &self,
        fee: Option<Decimal>,
        order_item_total: Decimal,
        waiver_level: u8,
    ) -> WaiverOutcome {
        let threshold = self.waivers.threshold_for(waiver_level);
        let waived = threshold.is_some_and(|min| order_item_total >= min);

        WaiverOutcome {
            payable_fee: if waived { Some(Decimal::ZERO) } else { fee },
            waived,
            threshold,
            label: threshold
                .filter(|_| waived)
                .map(|min| format!("free delivery: order ≥ R$ {:.2}", min)),
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PriceTier::default_table(), WaiverPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OUT_OF_SERVICE_AREA;

    #[test]
    fn test_second_tier_scenario() {
        let quote = PricingEngine::default().price_for(2.0, 15.0);
        assert_eq!(quote.fee, Some(Decimal::from(20)));
        assert_eq!(quote.tier_label, "1.5–3.0km / up to 20min");
    }

    #[test]
    fn test_out_of_area_scenario() {
        let quote = PricingEngine::default().price_for(20.0, 100.0);
        assert!(quote.is_out_of_area());
        assert_eq!(quote.tier_label, OUT_OF_SERVICE_AREA);
    }

    #[test]
    fn test_boundaries_are_upper_inclusive() {
        let engine = PricingEngine::default();
        assert_eq!(engine.price_for(1.5, 10.0).fee, Some(Decimal::from(15)));
        assert_eq!(engine.price_for(1.5001, 10.0).fee, Some(Decimal::from(20)));
        assert_eq!(engine.price_for(15.0, 90.0).fee, Some(Decimal::from(60)));
        assert_eq!(engine.price_for(15.0, 91.0).fee, None);
    }

    #[test]
    fn test_duration_can_push_into_higher_tier() {
        // distancia corta pero mucho tráfico
        let quote = PricingEngine::default().price_for(1.0, 25.0);
        assert_eq!(quote.fee, Some(Decimal::from(30)));
    }

    #[test]
    fn test_default_table_is_monotonic_and_sorted() {
        let engine = PricingEngine::default();
        assert!(engine.is_monotonic());

        let shuffled = vec![
            PriceTier::new(3.0, 20.0, Decimal::from(20), "b"),
            PriceTier::new(1.5, 10.0, Decimal::from(15), "a"),
        ];
        let engine = PricingEngine::new(shuffled, WaiverPolicy::default());
        assert_eq!(engine.tiers()[0].label, "a");
        assert_eq!(engine.price_for(1.0, 5.0).tier_label, "a");
    }

    #[test]
    fn test_at_most_one_first_match_over_grid() {
        let engine = PricingEngine::default();
        for km_step in 0..=40 {
            for min_step in 0..=24 {
                let km = km_step as f64 * 0.5;
                let min = (min_step * 5) as f64;
                let matches: Vec<_> = engine
                    .tiers()
                    .iter()
                    .filter(|t| t.covers(km, min))
                    .collect();
                let quote = engine.price_for(km, min);
                match matches.first() {
                    Some(first) => assert_eq!(quote.tier_label, first.label),
                    None => assert!(quote.is_out_of_area()),
                }
            }
        }
    }

    #[test]
    fn test_misconfigured_table_first_match_wins() {
        let engine = PricingEngine::new(
            vec![
                PriceTier::new(5.0, 60.0, Decimal::from(10), "wide"),
                PriceTier::new(5.0, 20.0, Decimal::from(99), "narrow"),
            ],
            WaiverPolicy::default(),
        );
        assert!(!engine.is_monotonic());
        assert_eq!(engine.price_for(2.0, 10.0).tier_label, "wide");
    }

    #[test]
    fn test_waiver_scenario() {
        let engine = PricingEngine::default();
        let outcome = engine.apply_waiver(Some(Decimal::from(60)), Decimal::from(300), 1);

        assert!(outcome.waived);
        assert_eq!(outcome.payable_fee, Some(Decimal::ZERO));
        assert_eq!(outcome.threshold, Some(Decimal::from(250)));
        assert_eq!(outcome.label.as_deref(), Some("free delivery: order ≥ R$ 250.00"));
    }

    #[test]
    fn test_waiver_threshold_is_inclusive() {
        let engine = PricingEngine::default();
        assert!(engine.apply_waiver(Some(Decimal::from(20)), Decimal::from(300), 3).waived);
        assert!(!engine.apply_waiver(Some(Decimal::from(20)), Decimal::new(29999, 2), 3).waived);
    }

    #[test]
    fn test_level_seven_never_waives() {
        let outcome = PricingEngine::default().apply_waiver(
            Some(Decimal::from(20)),
            Decimal::from(1_000_000),
            7,
        );
        assert!(!outcome.waived);
        assert_eq!(outcome.payable_fee, Some(Decimal::from(20)));
        assert!(outcome.label.is_none());
    }

    #[test]
    fn test_waiver_is_monotonic_in_order_total() {
        let engine = PricingEngine::default();
        for level in 1..=7u8 {
            let mut was_waived = false;
            for total in (0..=1_000).step_by(10) {
                let waived = engine
                    .apply_waiver(Some(Decimal::from(20)), Decimal::from(total), level)
                    .waived;
                assert!(!(was_waived && !waived), "level {} regressed at {}", level, total);
                was_waived = waived;
            }
        }
    }
}

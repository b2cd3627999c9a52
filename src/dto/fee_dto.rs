use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::services::resolution_pipeline::AttemptTrace;

// Request para calcular el frete de un pedido
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeeRequest {
    #[serde(default, alias = "enderecoTexto")]
    #[validate(custom = "validate_not_blank")]
    pub destination_address: String,
    #[serde(default, alias = "totalItens", deserialize_with = "null_as_zero")]
    pub order_item_total: Decimal,
}

/// `null` cuenta como pedido sin valor
fn null_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("destinationAddress is required".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeStatus {
    Ok,
    OutOfArea,
}

// Response del cálculo de frete
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeResult {
    pub status: FeeStatus,
    pub distance_km: f64,
    pub duration_min: u32,
    pub base_fee: Option<Decimal>,
    pub payable_fee: Option<Decimal>,
    pub waived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiver_label: Option<String>,
    pub tier_label: String,
    pub normalized_address: String,
    pub resolved_by: String,
    pub estimated: bool,
    pub trace: AttemptTrace,
}

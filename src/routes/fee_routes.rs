use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use crate::dto::{FeeRequest, FeeResult};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fee_router() -> Router<AppState> {
    Router::new()
        .route("/delivery-fee", post(calculate_fee))
        .route("/calcular-entrega", post(calculate_fee))
}

async fn calculate_fee(
    State(state): State<AppState>,
    payload: Result<Json<FeeRequest>, JsonRejection>,
) -> Result<Json<FeeResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let result = state.fee_service.calculate(&request).await?;
    Ok(Json(result))
}

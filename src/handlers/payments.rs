use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::holds;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub booking_id: String,
    /// Tokenized card reference from the payment form, opaque to us.
    pub source_id: String,
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub payment_id: String,
}

// POST /api/payments/deposit
pub async fn pay_deposit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment_id = holds::pay_deposit(
        &state.db,
        state.payments.as_ref(),
        &body.booking_id,
        &body.source_id,
        Utc::now().naive_utc(),
    )
    .await?;

    Ok(Json(PaymentResponse {
        success: true,
        payment_id,
    }))
}

// POST /api/payments/balance
pub async fn pay_balance(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment_id = holds::pay_balance(
        &state.db,
        state.payments.as_ref(),
        &body.booking_id,
        &body.source_id,
        Utc::now().naive_utc(),
    )
    .await?;

    Ok(Json(PaymentResponse {
        success: true,
        payment_id,
    }))
}

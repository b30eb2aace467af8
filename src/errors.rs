use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::payments::ChargeError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("date unavailable")]
    Conflict,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("deposit already paid")]
    AlreadyPaid,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    #[error("payment gateway error: {0}")]
    Gateway(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<ChargeError> for AppError {
    fn from(err: ChargeError) -> Self {
        match err {
            ChargeError::Declined(reason) => AppError::PaymentDeclined(reason),
            // A timed-out charge may still have gone through; never report
            // it as a decline.
            ChargeError::Timeout => AppError::Gateway("charge outcome unknown (timeout)".to_string()),
            ChargeError::Gateway(reason) => AppError::Gateway(reason),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::AlreadyPaid => StatusCode::CONFLICT,
            AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::PaymentDeclined(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

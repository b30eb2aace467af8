pub mod square;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Integer minor units (cents). Conversion to anything else happens
    /// inside the provider, never in the booking logic.
    pub amount_minor: i64,
    pub currency: &'static str,
    pub source_id: String,
    pub idempotency_key: String,
}

#[derive(Debug, Clone)]
pub struct Charge {
    pub payment_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChargeError {
    #[error("declined: {0}")]
    Declined(String),

    /// The gateway did not answer in time. The charge may or may not have
    /// been applied; callers must not retry under a new idempotency key
    /// until the outcome is established.
    #[error("gateway timeout")]
    Timeout,

    #[error("gateway error: {0}")]
    Gateway(String),
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<Charge, ChargeError>;
}

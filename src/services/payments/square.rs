use async_trait::async_trait;

use super::{Charge, ChargeError, ChargeRequest, PaymentProvider};

const SQUARE_VERSION: &str = "2024-01-18";

pub struct SquarePaymentsProvider {
    access_token: String,
    location_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl SquarePaymentsProvider {
    pub fn new(access_token: String, location_id: String, environment: &str) -> Self {
        let base_url = if environment == "production" {
            "https://connect.squareup.com".to_string()
        } else {
            "https://connect.squareupsandbox.com".to_string()
        };

        Self {
            access_token,
            location_id,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl PaymentProvider for SquarePaymentsProvider {
    async fn charge(&self, request: &ChargeRequest) -> Result<Charge, ChargeError> {
        let url = format!("{}/v2/payments", self.base_url);

        let body = serde_json::json!({
            "idempotency_key": request.idempotency_key,
            "source_id": request.source_id,
            "location_id": self.location_id,
            "amount_money": {
                "amount": request.amount_minor,
                "currency": request.currency,
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("Square-Version", SQUARE_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChargeError::Timeout
                } else {
                    ChargeError::Gateway(e.to_string())
                }
            })?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChargeError::Gateway(e.to_string()))?;

        if !status.is_success() {
            let detail = payload["errors"][0]["detail"]
                .as_str()
                .unwrap_or("payment was not accepted")
                .to_string();

            if status.is_client_error() {
                return Err(ChargeError::Declined(detail));
            }
            return Err(ChargeError::Gateway(detail));
        }

        let payment_id = payload["payment"]["id"]
            .as_str()
            .ok_or_else(|| ChargeError::Gateway("missing payment id in response".to_string()))?
            .to_string();

        Ok(Charge { payment_id })
    }
}

//! Order API client
//!
//! Submits the built payload to the external order-management backend. A
//! request that never reached the server is retried once; a response with a
//! non-success status is never retried, so a rejected order cannot be created
//! twice.

use serde::Deserialize;
use std::time::Duration;
use crate::payload::OrderSubmissionPayload;
use crate::{FlyerForgeError, Result};

const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct SubmittedOrder {
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    #[serde(alias = "orderId", alias = "_id")]
    id: Option<serde_json::Value>,
}

pub struct OrderClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OrderClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| FlyerForgeError::Transient(e.to_string()))?;
        Ok(Self { http_client, base_url: base_url.into() })
    }

    pub async fn submit(&self, payload: &OrderSubmissionPayload) -> Result<SubmittedOrder> {
        let url = format!("{}/orders", self.base_url);
        tracing::debug!(url = %url, total = payload.total_price, "Submitting order");

        let response = match self.http_client.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(first) => {
                // Network-level failure only: the request may never have left,
                // so one idempotent retry is safe.
                tracing::warn!(error = %first, "Order submission failed to send, retrying once");
                self.http_client
                    .post(&url)
                    .json(payload)
                    .send()
                    .await
                    .map_err(|e| FlyerForgeError::Transient(e.to_string()))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                format!("order API returned {}", status)
            } else {
                message
            };
            return Err(FlyerForgeError::SubmissionRejected(message));
        }

        let body: OrderResponse = response
            .json()
            .await
            .map_err(|e| FlyerForgeError::MalformedResponse { service: "orders", detail: e.to_string() })?;

        let order_id = body
            .id
            .as_ref()
            .and_then(super::id_from_value)
            .ok_or_else(|| FlyerForgeError::MalformedResponse {
                service: "orders",
                detail: "response carried no order id".to_string(),
            })?;

        tracing::info!(order_id = %order_id, "Order accepted");
        Ok(SubmittedOrder { order_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_id_synonyms_accepted() {
        for body in [json!({"id": "ord-1"}), json!({"orderId": "ord-1"}), json!({"_id": "ord-1"})] {
            let parsed: OrderResponse = serde_json::from_value(body).unwrap();
            assert_eq!(super::super::id_from_value(parsed.id.as_ref().unwrap()).as_deref(), Some("ord-1"));
        }
    }

    #[test]
    fn test_numeric_order_id_stringified() {
        let parsed: OrderResponse = serde_json::from_value(json!({"id": 4711})).unwrap();
        assert_eq!(super::super::id_from_value(parsed.id.as_ref().unwrap()).as_deref(), Some("4711"));
    }
}

//! Payment session client
//!
//! Hands the priced order to the external payment gateway as a one-item cart.
//! The gateway wants amounts in minor units; the only arithmetic obligation
//! here is `unit_amount = round(total * 100)`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::domain::value_objects::Money;
use crate::{FlyerForgeError, Result};

const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Serialize)]
pub struct PaymentItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

impl PaymentItem {
    /// One flyer order as a single line item.
    pub fn for_order(name: impl Into<String>, total: &Money) -> Self {
        Self { name: name.into(), unit_amount: total.to_minor_units(), quantity: 1 }
    }
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    items: &'a [PaymentItem],
    customer_email: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PaymentSession {
    #[serde(alias = "redirect_url")]
    pub url: String,
}

pub struct PaymentClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PaymentClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| FlyerForgeError::Transient(e.to_string()))?;
        Ok(Self { http_client, base_url: base_url.into() })
    }

    pub async fn create_session(&self, items: &[PaymentItem], customer_email: &str) -> Result<PaymentSession> {
        let url = format!("{}/sessions", self.base_url);
        tracing::debug!(url = %url, items = items.len(), "Creating payment session");

        let response = self
            .http_client
            .post(&url)
            .json(&SessionRequest { items, customer_email })
            .send()
            .await
            .map_err(|e| FlyerForgeError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                format!("payment gateway returned {}", status)
            } else {
                message
            };
            return Err(FlyerForgeError::PaymentRejected(message));
        }

        let session: PaymentSession = response
            .json()
            .await
            .map_err(|e| FlyerForgeError::MalformedResponse { service: "payments", detail: e.to_string() })?;

        tracing::info!(redirect = %session.url, "Payment session created");
        Ok(session)
    }
}

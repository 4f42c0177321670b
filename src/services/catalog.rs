//! Catalog item resolver
//!
//! The catalog source serves loosely-shaped JSON: prices arrive as numbers or
//! currency strings, field names vary (`title`/`name`, `image_url`/`imageUrl`),
//! and optional arrays may be missing entirely. Everything is normalized here
//! so internal types stay strict from this boundary inward.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::{FlyerForgeError, Result};

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Canonical product record, read-only to the order core.
#[derive(Clone, Debug, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// Always non-negative; unparseable source prices canonicalize to zero.
    pub base_price: Decimal,
    pub requires_photos: bool,
    pub category_ids: Vec<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCatalogItem {
    id: Option<serde_json::Value>,
    #[serde(alias = "name")]
    title: Option<String>,
    price: Option<serde_json::Value>,
    #[serde(alias = "requiresPhotos", default)]
    requires_photos: bool,
    #[serde(default)]
    categories: Vec<serde_json::Value>,
    #[serde(alias = "imageUrl")]
    image_url: Option<String>,
}

/// Strips everything but digits and `.` and parses the remainder as a
/// decimal. `"$15.00"` canonicalizes to `15`; anything unparseable (e.g.
/// `"N/A"`) canonicalizes to `0` with a warning, never an error.
pub fn canonical_price(raw: Option<&serde_json::Value>) -> Decimal {
    let text = match raw {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    let cleaned: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    match cleaned.parse::<Decimal>() {
        Ok(price) => price.max(Decimal::ZERO),
        Err(_) => {
            if !text.is_empty() {
                tracing::warn!(price = %text, "Unparseable catalog price, canonicalizing to 0");
            }
            Decimal::ZERO
        }
    }
}

impl CatalogItem {
    fn from_raw(fallback_id: &str, raw: RawCatalogItem) -> Self {
        let id = raw
            .id
            .as_ref()
            .and_then(super::id_from_value)
            .unwrap_or_else(|| fallback_id.to_string());
        Self {
            id,
            title: raw.title.unwrap_or_default(),
            base_price: canonical_price(raw.price.as_ref()),
            requires_photos: raw.requires_photos,
            category_ids: raw.categories.iter().filter_map(super::id_from_value).collect(),
            image_url: raw.image_url,
        }
    }

    pub fn shares_category_with(&self, other: &CatalogItem) -> bool {
        self.category_ids.iter().any(|c| other.category_ids.contains(c))
    }
}

/// HTTP client for the external catalog source.
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| FlyerForgeError::Transient(e.to_string()))?;
        Ok(Self { http_client, base_url: base_url.into() })
    }

    /// Resolves one item to its canonical shape. 404 maps to `ItemNotFound`;
    /// every other failure is transient and leaves no trace on the caller's
    /// state.
    pub async fn resolve(&self, id: &str) -> Result<CatalogItem> {
        let url = format!("{}/items/{}", self.base_url, id);
        tracing::debug!(item_id = %id, url = %url, "Resolving catalog item");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FlyerForgeError::Transient(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FlyerForgeError::ItemNotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(FlyerForgeError::Transient(format!("catalog returned {}", status)));
        }

        let raw: RawCatalogItem = response
            .json()
            .await
            .map_err(|e| FlyerForgeError::MalformedResponse { service: "catalog", detail: e.to_string() })?;

        let item = CatalogItem::from_raw(id, raw);
        tracing::info!(item_id = %item.id, title = %item.title, base_price = %item.base_price, "Resolved catalog item");
        Ok(item)
    }

    /// Items sharing any category with `item`, excluding `item` itself.
    /// Informational only; callers may cache it and let it go stale.
    pub async fn related(&self, item: &CatalogItem) -> Result<Vec<CatalogItem>> {
        let url = format!("{}/items", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FlyerForgeError::Transient(e.to_string()))?;
        if !response.status().is_success() {
            return Err(FlyerForgeError::Transient(format!("catalog returned {}", response.status())));
        }
        let raw: Vec<RawCatalogItem> = response
            .json()
            .await
            .map_err(|e| FlyerForgeError::MalformedResponse { service: "catalog", detail: e.to_string() })?;

        Ok(raw
            .into_iter()
            .map(|r| CatalogItem::from_raw("", r))
            .filter(|candidate| candidate.id != item.id && candidate.shares_category_with(item))
            .collect())
    }
}

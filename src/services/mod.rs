//! Outbound service clients
pub mod catalog;
pub mod orders;
pub mod payments;

pub use catalog::{CatalogClient, CatalogItem};
pub use orders::{OrderClient, SubmittedOrder};
pub use payments::{PaymentClient, PaymentItem, PaymentSession};

/// External APIs are loose about identifier types; accept strings or numbers.
pub(crate) fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

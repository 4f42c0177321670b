//! Domain events
use crate::domain::value_objects::{AddOnKind, DeliverySpeed};
use rust_decimal::Decimal;

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Config(ConfigEvent),
}

/// Events raised by an order configuration session. The owning session drains
/// these via `take_events()` and decides when to recompute the quote; there is
/// no ambient reactivity.
#[derive(Clone, Debug)]
pub enum ConfigEvent {
    Created { session_id: String },
    BasePriceResolved { flyer_id: String, base_price: Decimal },
    AddOnToggled { kind: AddOnKind, enabled: bool },
    DeliverySelected { speed: DeliverySpeed },
    SubtotalComputed { total: Decimal },
}

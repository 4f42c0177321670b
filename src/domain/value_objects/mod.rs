//! Value Objects for Flyer Orders

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    /// Amount in the currency's minor unit (cents for USD), rounded.
    /// Payment gateways take `unit_amount` in this form.
    pub fn to_minor_units(&self) -> i64 {
        (self.amount * Decimal::from(100)).round().to_i64().unwrap_or(0)
    }
}

impl Default for Money { fn default() -> Self { Self::zero("USD") } }

#[derive(Debug, Clone)] pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}

/// Uploaded asset reference. The core never touches the bytes; uploads are
/// opaque handles keyed by the field that owns them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub url: Option<String>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>) -> Self { Self { file_name: file_name.into(), url: None } }
}

/// Delivery speed selection. Wire values match what the order API expects;
/// labels are what the storefront shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverySpeed {
    Standard,
    Expedited,
    Rush,
}

impl DeliverySpeed {
    pub fn surcharge(&self) -> Decimal {
        match self {
            Self::Standard => Decimal::ZERO,
            Self::Expedited => Decimal::from(10),
            Self::Rush => Decimal::from(20),
        }
    }

    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Standard => "24hours",
            Self::Expedited => "5hours",
            Self::Rush => "1hour",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "24 hours",
            Self::Expedited => "5 hours",
            Self::Rush => "1 hour",
        }
    }
}

/// The fixed add-on menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOnKind {
    StorySize,
    CustomTreatment,
    Animated,
    InstagramPost,
}

/// Add-on flags for one order. `instagram_post` is always included and free,
/// so it starts true and stays true.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOns {
    pub story_size: bool,
    pub custom_treatment: bool,
    pub animated: bool,
    pub instagram_post: bool,
}

impl Default for AddOns {
    fn default() -> Self {
        Self { story_size: false, custom_treatment: false, animated: false, instagram_post: true }
    }
}

impl AddOns {
    pub fn is_enabled(&self, kind: AddOnKind) -> bool {
        match kind {
            AddOnKind::StorySize => self.story_size,
            AddOnKind::CustomTreatment => self.custom_treatment,
            AddOnKind::Animated => self.animated,
            AddOnKind::InstagramPost => self.instagram_post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_money_add() {
        let a = Money::usd(Decimal::new(100, 0));
        let b = Money::usd(Decimal::new(50, 0));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150, 0));
    }
    #[test]
    fn test_minor_units() {
        assert_eq!(Money::usd(Decimal::new(4550, 2)).to_minor_units(), 4550);
        assert_eq!(Money::usd(Decimal::from(45)).to_minor_units(), 4500);
    }
    #[test]
    fn test_delivery_surcharges() {
        assert_eq!(DeliverySpeed::Standard.surcharge(), Decimal::ZERO);
        assert_eq!(DeliverySpeed::Expedited.surcharge(), Decimal::from(10));
        assert_eq!(DeliverySpeed::Rush.surcharge(), Decimal::from(20));
    }
    #[test]
    fn test_add_ons_default_includes_instagram() {
        let add_ons = AddOns::default();
        assert!(add_ons.instagram_post);
        assert!(!add_ons.story_size);
    }
}

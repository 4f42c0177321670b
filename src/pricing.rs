//! Pricing engine
//!
//! A pure derivation from the order configuration to a total price. The total
//! is recomputed on every call; the only state it writes is the aggregate's
//! `subtotal` snapshot, kept solely for payload serialization. Callers must
//! recompute after mutating - nothing here detects staleness.

use rust_decimal::Decimal;
use crate::domain::aggregates::OrderConfiguration;
use crate::domain::value_objects::{AddOnKind, Money};

/// Flat surcharge for each add-on, in USD.
pub fn add_on_price(kind: AddOnKind) -> Decimal {
    match kind {
        AddOnKind::StorySize => Decimal::from(10),
        AddOnKind::CustomTreatment => Decimal::from(10),
        AddOnKind::Animated => Decimal::from(25),
        // Always included with every order, never billed.
        AddOnKind::InstagramPost => Decimal::ZERO,
    }
}

/// Computes the order total: base price + enabled add-ons + delivery
/// surcharge. Deterministic in `(base_price, add_ons, delivery_speed)`;
/// an unset delivery speed contributes zero.
pub fn compute_total(config: &mut OrderConfiguration) -> Money {
    let mut total = config.base_price();

    for kind in [AddOnKind::StorySize, AddOnKind::CustomTreatment, AddOnKind::Animated, AddOnKind::InstagramPost] {
        if config.add_ons().is_enabled(kind) {
            total += add_on_price(kind);
        }
    }

    total += config.delivery_speed().map(|s| s.surcharge()).unwrap_or(Decimal::ZERO);

    config.cache_subtotal(total);
    Money::usd(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DeliverySpeed;

    #[test]
    fn test_basic_order_scenario() {
        // base 15, story size on, rush delivery: 15 + 10 + 20 = 45
        let mut config = OrderConfiguration::new();
        config.set_base_price(Decimal::from(15));
        config.toggle_add_on(AddOnKind::StorySize);
        config.set_delivery_speed(DeliverySpeed::Rush);
        assert_eq!(compute_total(&mut config).amount(), Decimal::from(45));
    }

    #[test]
    fn test_empty_config_prices_at_zero() {
        let mut config = OrderConfiguration::new();
        assert_eq!(compute_total(&mut config).amount(), Decimal::ZERO);
    }

    #[test]
    fn test_determinism() {
        let mut config = OrderConfiguration::new();
        config.set_base_price(Decimal::from(30));
        config.toggle_add_on(AddOnKind::Animated);
        config.set_delivery_speed(DeliverySpeed::Expedited);
        let first = compute_total(&mut config).amount();
        let second = compute_total(&mut config).amount();
        assert_eq!(first, second);
        assert_eq!(first, Decimal::from(65));
    }

    #[test]
    fn test_monotonic_in_add_ons_and_delivery() {
        let speeds = [None, Some(DeliverySpeed::Standard), Some(DeliverySpeed::Expedited), Some(DeliverySpeed::Rush)];
        for speed in speeds {
            let mut config = OrderConfiguration::new();
            config.set_base_price(Decimal::from(15));
            if let Some(s) = speed { config.set_delivery_speed(s); }
            let mut prev = compute_total(&mut config).amount();
            for kind in [AddOnKind::StorySize, AddOnKind::CustomTreatment, AddOnKind::Animated] {
                config.toggle_add_on(kind);
                let next = compute_total(&mut config).amount();
                assert!(next >= prev, "enabling {:?} decreased the total", kind);
                prev = next;
            }
        }
        // faster delivery never lowers the price
        let mut config = OrderConfiguration::new();
        config.set_base_price(Decimal::from(15));
        config.set_delivery_speed(DeliverySpeed::Standard);
        let standard = compute_total(&mut config).amount();
        config.set_delivery_speed(DeliverySpeed::Expedited);
        let expedited = compute_total(&mut config).amount();
        config.set_delivery_speed(DeliverySpeed::Rush);
        let rush = compute_total(&mut config).amount();
        assert!(standard <= expedited && expedited <= rush);
    }

    #[test]
    fn test_subtotal_snapshot_cached() {
        let mut config = OrderConfiguration::new();
        config.set_base_price(Decimal::from(20));
        compute_total(&mut config);
        assert_eq!(config.subtotal(), Decimal::from(20));
        config.toggle_add_on(AddOnKind::Animated);
        // stale until recomputed, by design
        assert_eq!(config.subtotal(), Decimal::from(20));
        compute_total(&mut config);
        assert_eq!(config.subtotal(), Decimal::from(45));
    }
}

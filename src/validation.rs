//! Validation engine
//!
//! Pure derivation from the order configuration to the full list of
//! violations. Collects every violation instead of failing fast so the
//! storefront can show the whole list at once. Venue logo/text, sponsors,
//! images, and notes are always optional and never checked here.

use crate::domain::aggregates::OrderConfiguration;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool { self.violations.is_empty() }
    pub fn violations(&self) -> &[String] { &self.violations }
    pub fn into_violations(self) -> Vec<String> { self.violations }
}

/// Checks the seven submission-blocking rules, in display order.
pub fn validate(config: &OrderConfiguration) -> ValidationReport {
    let mut violations = Vec::new();
    let event = config.event();

    if event.presenting_as.trim().is_empty() {
        violations.push("Presenting name is required".to_string());
    }
    if event.title.trim().is_empty() {
        violations.push("Event title is required".to_string());
    }
    if event.date.is_none() {
        violations.push("Event date is required".to_string());
    }
    if event.address_and_phone.trim().is_empty() {
        violations.push("Address and phone is required".to_string());
    }
    if !config.contributors().iter().any(|c| !c.name.trim().is_empty()) {
        violations.push("At least one DJ or artist name is required".to_string());
    }
    if config.host().map_or(true, |h| h.name.trim().is_empty()) {
        violations.push("Host name is required".to_string());
    }
    if config.delivery_speed().is_none() {
        violations.push("Delivery speed must be selected".to_string());
    }

    ValidationReport { violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::aggregates::EventField;
    use crate::domain::value_objects::DeliverySpeed;

    fn fully_populated() -> OrderConfiguration {
        let mut config = OrderConfiguration::new();
        config.set_event_field(EventField::PresentingAs, "Club Nova Presents");
        config.set_event_field(EventField::Title, "Midnight Sessions");
        config.set_event_date(NaiveDate::from_ymd_opt(2026, 9, 12));
        config.set_event_field(EventField::AddressAndPhone, "12 Main St / 555-0100");
        config.add_contributor();
        config.update_contributor_name(0, "DJ Vex");
        config.set_host_name("MC Rae");
        config.set_delivery_speed(DeliverySpeed::Standard);
        config
    }

    #[test]
    fn test_empty_config_violates_all_seven_rules() {
        let report = validate(&OrderConfiguration::new());
        assert!(!report.is_valid());
        assert_eq!(report.violations().len(), 7);
    }

    #[test]
    fn test_fully_populated_config_is_valid() {
        let report = validate(&fully_populated());
        assert!(report.is_valid());
        assert!(report.violations().is_empty());
    }

    #[test]
    fn test_whitespace_names_do_not_count() {
        let mut config = fully_populated();
        config.update_contributor_name(0, "   ");
        let report = validate(&config);
        assert_eq!(report.violations(), &["At least one DJ or artist name is required".to_string()]);
    }

    #[test]
    fn test_host_with_blank_name_is_a_violation() {
        let mut config = fully_populated();
        config.set_host_name("");
        let report = validate(&config);
        assert_eq!(report.violations().len(), 1);
        assert!(report.violations()[0].contains("Host"));
    }

    #[test]
    fn test_images_and_sponsors_never_required() {
        // no venue logo, no sponsor slots filled, no contributor images
        let report = validate(&fully_populated());
        assert!(report.is_valid());
    }

    #[test]
    fn test_validation_is_pure() {
        let config = fully_populated();
        let first = validate(&config);
        let second = validate(&config);
        assert_eq!(first, second);
    }
}

//! Submission payload builder
//!
//! Pure mapping from the order configuration to the exact shape the external
//! order API accepts. The API rejects requests with missing keys, while the
//! product deliberately lets users submit incomplete creative fields, so every
//! absent optional value is substituted with a fixed default here. Keeping the
//! whole default table in one place keeps the contract auditable.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::{OrderConfiguration, SPONSOR_SLOTS};
use crate::domain::value_objects::DeliverySpeed;

/// Resolved identifiers and the point-in-time subtotal snapshot supplied by
/// the session layer. `today` is injected so date defaulting stays
/// deterministic under test.
#[derive(Clone, Debug)]
pub struct SubmissionContext {
    pub user_id: Option<String>,
    pub flyer_id: Option<String>,
    pub category_id: Option<String>,
    pub subtotal: Decimal,
    pub today: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NameEntry { pub name: String }

/// Outbound `POST /orders` body, snake_case keys as the order API expects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmissionPayload {
    pub presenting: String,
    pub event_title: String,
    pub event_date: String,
    pub flyer_info: String,
    pub address_phone: String,
    pub djs: Vec<NameEntry>,
    pub host: NameEntry,
    pub sponsors: Vec<NameEntry>,
    pub story_size_version: bool,
    pub custom_flyer: bool,
    pub animated_flyer: bool,
    pub instagram_post_size: bool,
    pub custom_notes: String,
    pub flyer_id: String,
    pub category_id: String,
    pub user_id: String,
    pub delivery_time: String,
    pub total_price: f64,
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() { default.to_string() } else { value.to_string() }
}

/// Builds the submission payload. Pure: two calls on the same configuration
/// and context produce identical payloads.
pub fn build(config: &OrderConfiguration, ctx: &SubmissionContext) -> OrderSubmissionPayload {
    let event = config.event();

    let mut djs: Vec<NameEntry> = config
        .contributors()
        .iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| NameEntry { name: c.name.clone() })
        .collect();
    if djs.is_empty() {
        djs = vec![
            NameEntry { name: "DJ Name".to_string() },
            NameEntry { name: "DJ Name".to_string() },
        ];
    }

    let host = NameEntry {
        name: config
            .host()
            .map(|h| h.name.as_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Host Name")
            .to_string(),
    };

    // Always exactly 3 sponsor entries; unfilled slots serialize as empty names.
    let sponsors: Vec<NameEntry> = (0..SPONSOR_SLOTS)
        .map(|slot| NameEntry {
            name: config.sponsors()[slot]
                .as_ref()
                .map(|a| a.file_name.clone())
                .unwrap_or_default(),
        })
        .collect();

    let event_date = event
        .date
        .unwrap_or(ctx.today)
        .format("%Y-%m-%d")
        .to_string();

    let delivery_time = config
        .delivery_speed()
        .unwrap_or(DeliverySpeed::Standard)
        .wire_value()
        .to_string();

    OrderSubmissionPayload {
        presenting: or_default(&event.presenting_as, "Presenting Event"),
        event_title: or_default(&event.title, "Event Title"),
        event_date,
        flyer_info: or_default(&event.info, "Event Information"),
        address_phone: or_default(&event.address_and_phone, "Address and Phone"),
        djs,
        host,
        sponsors,
        story_size_version: config.add_ons().story_size,
        custom_flyer: config.add_ons().custom_treatment,
        animated_flyer: config.add_ons().animated,
        instagram_post_size: config.add_ons().instagram_post,
        custom_notes: or_default(config.notes().unwrap_or(""), "Custom Notes"),
        flyer_id: ctx.flyer_id.clone().unwrap_or_else(|| "1".to_string()),
        category_id: ctx.category_id.clone().unwrap_or_else(|| "1".to_string()),
        user_id: ctx.user_id.clone().unwrap_or_default(),
        delivery_time,
        total_price: ctx.subtotal.to_f64().unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::EventField;
    use crate::domain::value_objects::Attachment;

    fn fixed_today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 8, 25).unwrap() }

    fn empty_context() -> SubmissionContext {
        SubmissionContext { user_id: None, flyer_id: None, category_id: None, subtotal: Decimal::ZERO, today: fixed_today() }
    }

    #[test]
    fn test_empty_config_gets_every_default() {
        let config = OrderConfiguration::new();
        let payload = build(&config, &empty_context());
        assert_eq!(payload.presenting, "Presenting Event");
        assert_eq!(payload.event_title, "Event Title");
        assert_eq!(payload.event_date, "2026-08-25");
        assert_eq!(payload.flyer_info, "Event Information");
        assert_eq!(payload.address_phone, "Address and Phone");
        assert_eq!(payload.djs, vec![NameEntry { name: "DJ Name".into() }, NameEntry { name: "DJ Name".into() }]);
        assert_eq!(payload.host.name, "Host Name");
        assert_eq!(payload.sponsors.len(), 3);
        assert!(payload.sponsors.iter().all(|s| s.name.is_empty()));
        assert_eq!(payload.custom_notes, "Custom Notes");
        assert_eq!(payload.flyer_id, "1");
        assert_eq!(payload.category_id, "1");
        assert_eq!(payload.user_id, "");
        assert_eq!(payload.delivery_time, "24hours");
        assert_eq!(payload.total_price, 0.0);
        assert!(payload.instagram_post_size);
        assert!(!payload.story_size_version);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut config = OrderConfiguration::new();
        config.set_event_field(EventField::Title, "Test");
        let ctx = empty_context();
        assert_eq!(build(&config, &ctx), build(&config, &ctx));
    }

    #[test]
    fn test_real_contributors_are_not_padded() {
        let mut config = OrderConfiguration::new();
        config.add_contributor();
        config.update_contributor_name(0, "DJ Vex");
        config.add_contributor(); // left blank, dropped from the payload
        let payload = build(&config, &empty_context());
        assert_eq!(payload.djs, vec![NameEntry { name: "DJ Vex".into() }]);
    }

    #[test]
    fn test_sponsor_filenames_carried_through() {
        let mut config = OrderConfiguration::new();
        config.set_sponsor(1, Some(Attachment::new("brand.png")));
        let payload = build(&config, &empty_context());
        assert_eq!(payload.sponsors[0].name, "");
        assert_eq!(payload.sponsors[1].name, "brand.png");
        assert_eq!(payload.sponsors[2].name, "");
    }

    #[test]
    fn test_context_values_win_over_defaults() {
        let config = OrderConfiguration::new();
        let ctx = SubmissionContext {
            user_id: Some("u-77".into()),
            flyer_id: Some("f-12".into()),
            category_id: Some("c-3".into()),
            subtotal: Decimal::from(45),
            today: fixed_today(),
        };
        let payload = build(&config, &ctx);
        assert_eq!(payload.user_id, "u-77");
        assert_eq!(payload.flyer_id, "f-12");
        assert_eq!(payload.category_id, "c-3");
        assert_eq!(payload.total_price, 45.0);
    }

    #[test]
    fn test_event_date_formats_iso() {
        let mut config = OrderConfiguration::new();
        config.set_event_date(NaiveDate::from_ymd_opt(2026, 12, 31));
        let payload = build(&config, &empty_context());
        assert_eq!(payload.event_date, "2026-12-31");
    }

    #[test]
    fn test_snake_case_wire_keys() {
        let payload = build(&OrderConfiguration::new(), &empty_context());
        let json = serde_json::to_value(&payload).unwrap();
        for key in ["presenting", "event_title", "event_date", "flyer_info", "address_phone",
                    "djs", "host", "sponsors", "story_size_version", "custom_flyer",
                    "animated_flyer", "instagram_post_size", "custom_notes", "flyer_id",
                    "category_id", "user_id", "delivery_time", "total_price"] {
            assert!(json.get(key).is_some(), "missing wire key {key}");
        }
    }
}

//! Order Configuration Aggregate
//!
//! The in-progress representation of one flyer order, owned exclusively by the
//! UI session that created it. Mutation operations enforce shape constraints
//! only; business rules live in the validation engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use crate::domain::events::{ConfigEvent, DomainEvent};
use crate::domain::value_objects::{AddOnKind, AddOns, Attachment, DeliverySpeed};

/// Hard cap on DJ/artist entries per flyer.
pub const MAX_CONTRIBUTORS: usize = 4;
/// Sponsors always have exactly this many addressable slots.
pub const SPONSOR_SLOTS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub presenting_as: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub info: String,
    pub address_and_phone: String,
    pub venue_logo: Option<Attachment>,
    pub venue_text: String,
}

/// A billed name on the flyer (DJ or artist). The image is optional even when
/// the flyer tier supports photos.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contributor { pub name: String, pub image: Option<Attachment> }

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Host { pub name: String, pub image: Option<Attachment> }

/// String-valued event fields addressable through `set_event_field`. Date and
/// venue logo have dedicated setters since their types differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventField { PresentingAs, Title, Info, AddressAndPhone, VenueText }

#[derive(Clone, Debug)]
pub struct OrderConfiguration {
    id: String,
    flyer_id: Option<String>,
    category_id: Option<String>,
    user_id: Option<String>,
    event: EventDetails,
    contributors: Vec<Contributor>,
    host: Option<Host>,
    sponsors: [Option<Attachment>; SPONSOR_SLOTS],
    add_ons: AddOns,
    delivery_speed: Option<DeliverySpeed>,
    notes: Option<String>,
    base_price: Decimal,
    requires_photos: bool,
    // Snapshot of the last computed total, written by the pricing engine.
    // Never read without recomputing first, except for payload serialization.
    subtotal: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl OrderConfiguration {
    pub fn new() -> Self {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut config = Self {
            id: id.clone(), flyer_id: None, category_id: None, user_id: None,
            event: EventDetails::default(), contributors: vec![], host: None,
            sponsors: [None, None, None], add_ons: AddOns::default(),
            delivery_speed: None, notes: None, base_price: Decimal::ZERO,
            requires_photos: false, subtotal: Decimal::ZERO,
            created_at: now, updated_at: now, events: vec![],
        };
        config.raise_event(DomainEvent::Config(ConfigEvent::Created { session_id: id }));
        config
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn flyer_id(&self) -> Option<&str> { self.flyer_id.as_deref() }
    pub fn category_id(&self) -> Option<&str> { self.category_id.as_deref() }
    pub fn user_id(&self) -> Option<&str> { self.user_id.as_deref() }
    pub fn event(&self) -> &EventDetails { &self.event }
    pub fn contributors(&self) -> &[Contributor] { &self.contributors }
    pub fn host(&self) -> Option<&Host> { self.host.as_ref() }
    pub fn sponsors(&self) -> &[Option<Attachment>; SPONSOR_SLOTS] { &self.sponsors }
    pub fn add_ons(&self) -> &AddOns { &self.add_ons }
    pub fn delivery_speed(&self) -> Option<DeliverySpeed> { self.delivery_speed }
    pub fn notes(&self) -> Option<&str> { self.notes.as_deref() }
    pub fn base_price(&self) -> Decimal { self.base_price }
    pub fn requires_photos(&self) -> bool { self.requires_photos }
    pub fn subtotal(&self) -> Decimal { self.subtotal }

    // ---- event details ----

    pub fn set_event_field(&mut self, field: EventField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EventField::PresentingAs => self.event.presenting_as = value,
            EventField::Title => self.event.title = value,
            EventField::Info => self.event.info = value,
            EventField::AddressAndPhone => self.event.address_and_phone = value,
            EventField::VenueText => self.event.venue_text = value,
        }
        self.touch();
    }

    pub fn set_event_date(&mut self, date: Option<NaiveDate>) { self.event.date = date; self.touch(); }
    pub fn set_venue_logo(&mut self, logo: Option<Attachment>) { self.event.venue_logo = logo; self.touch(); }

    // ---- contributors ----

    /// Appends an empty entry. No-op once the cap of 4 is reached.
    pub fn add_contributor(&mut self) {
        if self.contributors.len() >= MAX_CONTRIBUTORS { return; }
        self.contributors.push(Contributor::default());
        self.touch();
    }

    /// No-op if `index` is out of bounds.
    pub fn remove_contributor(&mut self, index: usize) {
        if index >= self.contributors.len() { return; }
        self.contributors.remove(index);
        self.touch();
    }

    pub fn update_contributor_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(entry) = self.contributors.get_mut(index) {
            entry.name = name.into();
            self.touch();
        }
    }

    pub fn update_contributor_image(&mut self, index: usize, image: Option<Attachment>) {
        if let Some(entry) = self.contributors.get_mut(index) {
            entry.image = image;
            self.touch();
        }
    }

    // ---- host and sponsors ----

    pub fn set_host_name(&mut self, name: impl Into<String>) {
        self.host.get_or_insert_with(Host::default).name = name.into();
        self.touch();
    }

    pub fn set_host_image(&mut self, image: Option<Attachment>) {
        self.host.get_or_insert_with(Host::default).image = image;
        self.touch();
    }

    /// No-op for slots beyond the fixed 3.
    pub fn set_sponsor(&mut self, slot: usize, attachment: Option<Attachment>) {
        if let Some(entry) = self.sponsors.get_mut(slot) {
            *entry = attachment;
            self.touch();
        }
    }

    // ---- add-ons, delivery, notes ----

    /// Flips the named flag. The Instagram post size is always included in the
    /// order (it prices at zero), so toggling it is a no-op.
    pub fn toggle_add_on(&mut self, kind: AddOnKind) {
        let enabled = match kind {
            AddOnKind::StorySize => { self.add_ons.story_size = !self.add_ons.story_size; self.add_ons.story_size }
            AddOnKind::CustomTreatment => { self.add_ons.custom_treatment = !self.add_ons.custom_treatment; self.add_ons.custom_treatment }
            AddOnKind::Animated => { self.add_ons.animated = !self.add_ons.animated; self.add_ons.animated }
            AddOnKind::InstagramPost => return,
        };
        self.touch();
        self.raise_event(DomainEvent::Config(ConfigEvent::AddOnToggled { kind, enabled }));
    }

    pub fn set_delivery_speed(&mut self, speed: DeliverySpeed) {
        self.delivery_speed = Some(speed);
        self.touch();
        self.raise_event(DomainEvent::Config(ConfigEvent::DeliverySelected { speed }));
    }

    pub fn set_notes(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.notes = if text.trim().is_empty() { None } else { Some(text) };
        self.touch();
    }

    // ---- identity / context ----
    // Idempotent setters: empty input is ignored so a populated value is never
    // clobbered by a late or blank upstream resolution.

    pub fn set_user_id(&mut self, id: impl Into<String>) { Self::set_identifier(&mut self.user_id, id.into()); }
    pub fn set_flyer_id(&mut self, id: impl Into<String>) { Self::set_identifier(&mut self.flyer_id, id.into()); }
    pub fn set_category_id(&mut self, id: impl Into<String>) { Self::set_identifier(&mut self.category_id, id.into()); }

    fn set_identifier(slot: &mut Option<String>, value: String) {
        if value.trim().is_empty() { return; }
        *slot = Some(value);
    }

    /// Applied when the catalog resolver completes. Negative inputs clamp to
    /// zero; canonicalization upstream should already guarantee that.
    pub fn set_base_price(&mut self, price: Decimal) {
        self.base_price = price.max(Decimal::ZERO);
        self.touch();
        if let Some(flyer_id) = self.flyer_id.clone() {
            let base_price = self.base_price;
            self.raise_event(DomainEvent::Config(ConfigEvent::BasePriceResolved { flyer_id, base_price }));
        }
    }

    pub fn set_requires_photos(&mut self, required: bool) { self.requires_photos = required; self.touch(); }

    /// Called by the pricing engine only.
    pub(crate) fn cache_subtotal(&mut self, total: Decimal) {
        self.subtotal = total;
        self.raise_event(DomainEvent::Config(ConfigEvent::SubtotalComputed { total }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

impl Default for OrderConfiguration {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contributor_cap() {
        let mut config = OrderConfiguration::new();
        for _ in 0..10 { config.add_contributor(); }
        assert_eq!(config.contributors().len(), 4);
    }

    #[test]
    fn test_remove_contributor_out_of_bounds_is_noop() {
        let mut config = OrderConfiguration::new();
        config.add_contributor();
        config.remove_contributor(5);
        assert_eq!(config.contributors().len(), 1);
    }

    #[test]
    fn test_identifier_never_cleared_by_empty() {
        let mut config = OrderConfiguration::new();
        config.set_flyer_id("flyer-9");
        config.set_flyer_id("");
        config.set_flyer_id("   ");
        assert_eq!(config.flyer_id(), Some("flyer-9"));
    }

    #[test]
    fn test_instagram_post_is_immutable() {
        let mut config = OrderConfiguration::new();
        config.toggle_add_on(AddOnKind::InstagramPost);
        assert!(config.add_ons().instagram_post);
        config.toggle_add_on(AddOnKind::StorySize);
        assert!(config.add_ons().story_size);
    }

    #[test]
    fn test_host_created_on_first_write() {
        let mut config = OrderConfiguration::new();
        assert!(config.host().is_none());
        config.set_host_name("MC Rae");
        assert_eq!(config.host().unwrap().name, "MC Rae");
    }

    #[test]
    fn test_sponsor_slots_fixed() {
        let mut config = OrderConfiguration::new();
        config.set_sponsor(2, Some(Attachment::new("sponsor.png")));
        config.set_sponsor(3, Some(Attachment::new("ignored.png")));
        assert_eq!(config.sponsors().len(), 3);
        assert!(config.sponsors()[2].is_some());
    }

    #[test]
    fn test_negative_base_price_clamps() {
        let mut config = OrderConfiguration::new();
        config.set_base_price(Decimal::from(-5));
        assert_eq!(config.base_price(), Decimal::ZERO);
    }

    #[test]
    fn test_delivery_selection_raises_event() {
        let mut config = OrderConfiguration::new();
        config.take_events();
        config.set_delivery_speed(DeliverySpeed::Rush);
        let events = config.take_events();
        assert_eq!(events.len(), 1);
    }
}

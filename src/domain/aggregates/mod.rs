//! Aggregates module
pub mod order_config;

pub use order_config::{
    Contributor, EventDetails, EventField, Host, OrderConfiguration, MAX_CONTRIBUTORS,
    SPONSOR_SLOTS,
};

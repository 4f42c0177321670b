//! FlyerForge - Custom Event-Flyer Order Core
//!
//! The pricing and configuration engine behind a custom flyer storefront.
//!
//! ## Features
//! - Catalog item resolution with price canonicalization
//! - In-session order configuration (event details, DJs, host, sponsors, add-ons)
//! - Pure pricing and validation engines
//! - Submission payload building for the external order API
//! - Payment session handoff (amounts in minor units)

use thiserror::Error;

pub mod domain;
pub mod payload;
pub mod pricing;
pub mod services;
pub mod validation;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FlyerForgeError {
    #[error("Catalog item not found: {0}")]
    ItemNotFound(String),

    #[error("Order session not found")]
    SessionNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Order configuration is incomplete")]
    ValidationFailed(Vec<String>),

    #[error("Order submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("Payment session rejected: {0}")]
    PaymentRejected(String),

    #[error("Network failure: {0}")]
    Transient(String),

    #[error("Malformed response from {service}: {detail}")]
    MalformedResponse { service: &'static str, detail: String },
}

pub type Result<T> = std::result::Result<T, FlyerForgeError>;

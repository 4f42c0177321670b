//! FlyerForge - Event-Flyer Order Configuration Service
//!
//! HTTP surface over the order core. Each order configuration lives in an
//! in-memory session owned by one storefront client; nothing is persisted
//! locally - orders live in the external order API once confirmed.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

use flyerforge::domain::aggregates::{EventField, OrderConfiguration};
use flyerforge::domain::value_objects::{AddOnKind, Attachment, DeliverySpeed};
use flyerforge::services::{CatalogClient, CatalogItem, OrderClient, PaymentClient, PaymentItem};
use flyerforge::{payload, pricing, validation, FlyerForgeError};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, OrderConfiguration>>>,
    pub catalog: Arc<CatalogClient>,
    pub orders: Arc<OrderClient>,
    pub payments: Arc<PaymentClient>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog_url = std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "http://localhost:9001".to_string());
    let order_url = std::env::var("ORDER_API_URL").unwrap_or_else(|_| "http://localhost:9002".to_string());
    let payment_url = std::env::var("PAYMENT_API_URL").unwrap_or_else(|_| "http://localhost:9003".to_string());

    let state = AppState {
        sessions: Arc::new(RwLock::new(HashMap::new())),
        catalog: Arc::new(CatalogClient::new(catalog_url)?),
        orders: Arc::new(OrderClient::new(order_url)?),
        payments: Arc::new(PaymentClient::new(payment_url)?),
    };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "flyerforge"})) }))
        .route("/api/v1/items/:id", get(get_item))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", axum::routing::delete(discard_session))
        .route("/api/v1/sessions/:id/flyer", put(attach_flyer))
        .route("/api/v1/sessions/:id/identity", put(set_identity))
        .route("/api/v1/sessions/:id/event", axum::routing::patch(update_event))
        .route("/api/v1/sessions/:id/contributors", post(add_contributor))
        .route("/api/v1/sessions/:id/contributors/:index", axum::routing::patch(update_contributor).delete(remove_contributor))
        .route("/api/v1/sessions/:id/host", put(set_host))
        .route("/api/v1/sessions/:id/sponsors/:slot", put(set_sponsor))
        .route("/api/v1/sessions/:id/add-ons/:kind", post(toggle_add_on))
        .route("/api/v1/sessions/:id/delivery", put(set_delivery))
        .route("/api/v1/sessions/:id/notes", put(set_notes))
        .route("/api/v1/sessions/:id/quote", get(get_quote))
        .route("/api/v1/sessions/:id/validation", get(get_validation))
        .route("/api/v1/sessions/:id/checkout", post(checkout))
        .route("/api/v1/sessions/:id/confirm", post(confirm))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    tracing::info!("FlyerForge listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

// =============================================================================
// Error mapping
// =============================================================================

struct ApiError(FlyerForgeError);

impl From<FlyerForgeError> for ApiError {
    fn from(e: FlyerForgeError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            FlyerForgeError::ItemNotFound(_) | FlyerForgeError::SessionNotFound => {
                (StatusCode::NOT_FOUND, serde_json::json!({"error": self.0.to_string()}))
            }
            FlyerForgeError::ValidationFailed(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({"error": "validation failed", "violations": violations}),
            ),
            FlyerForgeError::SubmissionRejected(m) | FlyerForgeError::PaymentRejected(m) => {
                (StatusCode::BAD_GATEWAY, serde_json::json!({"error": m}))
            }
            FlyerForgeError::MalformedResponse { .. } => {
                (StatusCode::BAD_GATEWAY, serde_json::json!({"error": self.0.to_string()}))
            }
            FlyerForgeError::InvalidInput(m) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": m})),
            FlyerForgeError::Transient(m) => (StatusCode::SERVICE_UNAVAILABLE, serde_json::json!({"error": m})),
        };
        (status, Json(body)).into_response()
    }
}

/// Runs a closure against one session under the write lock, then drains and
/// logs the domain events the mutation raised.
async fn with_session<T>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut OrderConfiguration) -> T,
) -> Result<T, ApiError> {
    let mut sessions = state.sessions.write().await;
    let config = sessions.get_mut(id).ok_or(FlyerForgeError::SessionNotFound)?;
    let out = f(config);
    for event in config.take_events() {
        tracing::debug!(session = %id, event = ?event, "Configuration event");
    }
    Ok(out)
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Serialize)]
struct ItemResponse {
    #[serde(flatten)]
    item: CatalogItem,
    related: Vec<CatalogItem>,
}

async fn get_item(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<ItemResponse>, ApiError> {
    let item = s.catalog.resolve(&id).await?;
    // Related items are informational; a failed lookup never blocks the item.
    let related = s.catalog.related(&item).await.unwrap_or_default();
    Ok(Json(ItemResponse { item, related }))
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[derive(Serialize)]
struct SessionCreated { session_id: String }

async fn create_session(State(s): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let mut config = OrderConfiguration::new();
    let id = config.id().to_string();
    for event in config.take_events() {
        tracing::debug!(session = %id, event = ?event, "Configuration event");
    }
    s.sessions.write().await.insert(id.clone(), config);
    (StatusCode::CREATED, Json(SessionCreated { session_id: id }))
}

async fn discard_session(State(s): State<AppState>, Path(id): Path<String>) -> StatusCode {
    s.sessions.write().await.remove(&id);
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct AttachFlyerRequest { flyer_id: String }

/// Resolves the chosen flyer and applies its canonical price to the session.
/// The session may be discarded while the catalog fetch is in flight; a late
/// result is dropped rather than applied to a dead aggregate.
async fn attach_flyer(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(r): Json<AttachFlyerRequest>,
) -> Result<Json<CatalogItem>, ApiError> {
    if !s.sessions.read().await.contains_key(&id) {
        return Err(FlyerForgeError::SessionNotFound.into());
    }

    let item = s.catalog.resolve(&r.flyer_id).await?;

    let mut sessions = s.sessions.write().await;
    match sessions.get_mut(&id) {
        Some(config) => {
            config.set_flyer_id(item.id.as_str());
            if let Some(category) = item.category_ids.first() {
                config.set_category_id(category.as_str());
            }
            config.set_requires_photos(item.requires_photos);
            config.set_base_price(item.base_price);
            for event in config.take_events() {
                tracing::debug!(session = %id, event = ?event, "Configuration event");
            }
            Ok(Json(item))
        }
        None => {
            tracing::debug!(session = %id, flyer = %item.id, "Session discarded during catalog fetch, dropping result");
            Err(FlyerForgeError::SessionNotFound.into())
        }
    }
}

#[derive(Deserialize)]
struct IdentityRequest { user_id: String }

async fn set_identity(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<IdentityRequest>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| c.set_user_id(r.user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Aggregate mutations
// =============================================================================

#[derive(Deserialize, Default)]
struct EventPatch {
    presenting_as: Option<String>,
    title: Option<String>,
    date: Option<NaiveDate>,
    info: Option<String>,
    address_and_phone: Option<String>,
    venue_text: Option<String>,
    venue_logo: Option<Attachment>,
}

async fn update_event(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<EventPatch>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| {
        if let Some(v) = r.presenting_as { c.set_event_field(EventField::PresentingAs, v); }
        if let Some(v) = r.title { c.set_event_field(EventField::Title, v); }
        if let Some(v) = r.info { c.set_event_field(EventField::Info, v); }
        if let Some(v) = r.address_and_phone { c.set_event_field(EventField::AddressAndPhone, v); }
        if let Some(v) = r.venue_text { c.set_event_field(EventField::VenueText, v); }
        if r.date.is_some() { c.set_event_date(r.date); }
        if r.venue_logo.is_some() { c.set_venue_logo(r.venue_logo); }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_contributor(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let count = with_session(&s, &id, |c| { c.add_contributor(); c.contributors().len() }).await?;
    Ok(Json(serde_json::json!({"contributors": count})))
}

#[derive(Deserialize, Default)]
struct ContributorPatch { name: Option<String>, image: Option<Attachment> }

async fn update_contributor(State(s): State<AppState>, Path((id, index)): Path<(String, usize)>, Json(r): Json<ContributorPatch>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| {
        if let Some(name) = r.name { c.update_contributor_name(index, name); }
        if r.image.is_some() { c.update_contributor_image(index, r.image); }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_contributor(State(s): State<AppState>, Path((id, index)): Path<(String, usize)>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| c.remove_contributor(index)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_host(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<ContributorPatch>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| {
        if let Some(name) = r.name { c.set_host_name(name); }
        if r.image.is_some() { c.set_host_image(r.image); }
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct SponsorRequest { attachment: Option<Attachment> }

async fn set_sponsor(State(s): State<AppState>, Path((id, slot)): Path<(String, usize)>, Json(r): Json<SponsorRequest>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| c.set_sponsor(slot, r.attachment)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_add_on(State(s): State<AppState>, Path((id, kind)): Path<(String, String)>) -> Result<Json<serde_json::Value>, ApiError> {
    let kind: AddOnKind = serde_json::from_value(serde_json::Value::String(kind.clone()))
        .map_err(|_| FlyerForgeError::InvalidInput(format!("unknown add-on: {kind}")))?;
    let add_ons = with_session(&s, &id, |c| { c.toggle_add_on(kind); c.add_ons().clone() }).await?;
    Ok(Json(serde_json::to_value(add_ons).unwrap_or_default()))
}

#[derive(Deserialize)]
struct DeliveryRequest { speed: DeliverySpeed }

async fn set_delivery(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<DeliveryRequest>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| c.set_delivery_speed(r.speed)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct NotesRequest { notes: String }

async fn set_notes(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<NotesRequest>) -> Result<StatusCode, ApiError> {
    with_session(&s, &id, |c| c.set_notes(r.notes)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Pricing, validation, checkout
// =============================================================================

#[derive(Serialize)]
struct QuoteResponse {
    base_price: rust_decimal::Decimal,
    delivery_surcharge: rust_decimal::Decimal,
    delivery_label: Option<&'static str>,
    total: rust_decimal::Decimal,
}

async fn get_quote(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<QuoteResponse>, ApiError> {
    let quote = with_session(&s, &id, |c| {
        let total = pricing::compute_total(c);
        QuoteResponse {
            base_price: c.base_price(),
            delivery_surcharge: c.delivery_speed().map(|d| d.surcharge()).unwrap_or_default(),
            delivery_label: c.delivery_speed().map(|d| d.label()),
            total: total.amount(),
        }
    })
    .await?;
    Ok(Json(quote))
}

#[derive(Serialize)]
struct ValidationResponse { valid: bool, violations: Vec<String> }

async fn get_validation(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<ValidationResponse>, ApiError> {
    let report = with_session(&s, &id, |c| validation::validate(c)).await?;
    Ok(Json(ValidationResponse { valid: report.is_valid(), violations: report.into_violations() }))
}

#[derive(Deserialize, Validate)]
struct CheckoutRequest {
    #[validate(email)]
    contact_email: String,
}

#[derive(Serialize)]
struct CheckoutResponse { payment_url: String, total: rust_decimal::Decimal }

/// First leg of the unified flow: validate, price, open a payment session.
/// The order itself is created on `/confirm` after payment.
async fn checkout(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<CheckoutRequest>) -> Result<Json<CheckoutResponse>, ApiError> {
    r.validate()
        .map_err(|e| FlyerForgeError::InvalidInput(e.to_string()))?;

    let (total, item_name) = with_session(&s, &id, |c| {
        let report = validation::validate(c);
        if !report.is_valid() {
            return Err(FlyerForgeError::ValidationFailed(report.into_violations()));
        }
        let total = pricing::compute_total(c);
        let name = if c.event().title.trim().is_empty() { "Custom event flyer".to_string() } else { format!("{} flyer", c.event().title) };
        Ok((total, name))
    })
    .await??;

    let items = [PaymentItem::for_order(item_name, &total)];
    let session = s.payments.create_session(&items, &r.contact_email).await?;
    Ok(Json(CheckoutResponse { payment_url: session.url, total: total.amount() }))
}

#[derive(Serialize)]
struct ConfirmResponse { order_id: String }

/// Second leg: build the submission payload from the aggregate snapshot and
/// post it to the order API. The session is dropped only after the order is
/// accepted; any failure leaves it intact for resubmission.
async fn confirm(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<ConfirmResponse>, ApiError> {
    let outbound = with_session(&s, &id, |c| {
        let report = validation::validate(c);
        if !report.is_valid() {
            return Err(FlyerForgeError::ValidationFailed(report.into_violations()));
        }
        pricing::compute_total(c);
        let ctx = payload::SubmissionContext {
            user_id: c.user_id().map(str::to_string),
            flyer_id: c.flyer_id().map(str::to_string),
            category_id: c.category_id().map(str::to_string),
            subtotal: c.subtotal(),
            today: Utc::now().date_naive(),
        };
        Ok(payload::build(c, &ctx))
    })
    .await??;

    let submitted = s.orders.submit(&outbound).await?;
    s.sessions.write().await.remove(&id);
    Ok(Json(ConfirmResponse { order_id: submitted.order_id }))
}

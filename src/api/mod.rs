//! API handlers for the library records REST endpoints

pub mod accounts;
pub mod checkouts;
pub mod health;
pub mod items;
pub mod openapi;
pub mod reservations;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppError, AppState};

/// JSON body extractor that validates before the handler runs.
///
/// Body rejections (missing content type, malformed JSON, wrong field types) and
/// validation failures are all reported as `400 BadValue`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Items
        .route("/items", post(items::create_item))
        .route("/items/:id", get(items::get_item))
        // Accounts
        .route("/accounts", post(accounts::create_account))
        .route("/accounts/person/:card_id", get(accounts::get_account))
        .route("/accounts/person/:card_id", delete(accounts::delete_account))
        .route("/accounts/person/:card_id/deletable", get(accounts::can_delete_account))
        // Checkouts
        .route("/checkout", post(checkouts::create_checkout))
        .route("/checkout/person/:card_id", get(checkouts::get_checkouts_by_person))
        .route("/checkout/:id", delete(checkouts::return_checkout))
        // Reservations
        .route("/reservations", post(reservations::add_reservation))
        .route("/reservations/:id", put(reservations::update_reservation))
        .route("/reservations/:id/checkout", post(reservations::checkout_reservation))
        .route("/reservations/item/:item_id", get(reservations::get_item_queue))
        .route(
            "/reservations/person/:card_id",
            get(reservations::get_reservations_by_person).delete(reservations::cancel_reservation),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

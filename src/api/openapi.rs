//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accounts, checkouts, health, items, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Records API",
        version = "1.0.0",
        description = "Checkouts, reservation queues and copy availability",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Items
        items::get_item,
        items::create_item,
        // Accounts
        accounts::create_account,
        accounts::get_account,
        accounts::can_delete_account,
        accounts::delete_account,
        // Checkouts
        checkouts::get_checkouts_by_person,
        checkouts::create_checkout,
        checkouts::return_checkout,
        // Reservations
        reservations::get_reservations_by_person,
        reservations::get_item_queue,
        reservations::add_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        reservations::checkout_reservation,
    ),
    components(
        schemas(
            // Items
            crate::models::item::ItemDetails,
            crate::models::item::CreateItem,
            // Accounts
            crate::models::account::Account,
            crate::models::account::CreateAccount,
            // Checkouts
            crate::models::checkout::CheckoutDetails,
            crate::models::checkout::CreateCheckout,
            checkouts::CheckoutCreated,
            checkouts::ReturnResponse,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::UpdateReservation,
            crate::models::reservation::CancelReservation,
            reservations::ReservationCreated,
            // Common
            crate::api::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Catalog items and availability"),
        (name = "accounts", description = "Library accounts"),
        (name = "checkouts", description = "Checkouts and returns"),
        (name = "reservations", description = "Reservation queues")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

//! Checkout endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::checkout::{Checkout, CheckoutDetails, CreateCheckout},
};

use super::ValidatedJson;

/// Checkout response
#[derive(Serialize, ToSchema)]
pub struct CheckoutCreated {
    pub message: String,
    #[serde(rename = "CheckoutID")]
    pub checkout_id: i32,
    #[serde(rename = "ReturnByDate")]
    pub return_by_date: NaiveDate,
}

impl From<Checkout> for CheckoutCreated {
    fn from(checkout: Checkout) -> Self {
        Self {
            message: "Item checked out successfully".to_string(),
            checkout_id: checkout.id,
            return_by_date: checkout.return_by_date,
        }
    }
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    #[serde(rename = "CheckoutID")]
    pub checkout_id: i32,
    #[serde(rename = "ItemID")]
    pub item_id: i32,
    #[serde(rename = "CopiesAvailable")]
    pub copies_available: i32,
}

/// Get open checkouts for a card
#[utoipa::path(
    get,
    path = "/checkout/person/{card_id}",
    tag = "checkouts",
    params(
        ("card_id" = i32, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Open checkouts", body = Vec<CheckoutDetails>),
        (status = 404, description = "No checkouts for this card")
    )
)]
pub async fn get_checkouts_by_person(
    State(state): State<crate::AppState>,
    Path(card_id): Path<i32>,
) -> AppResult<Json<Vec<CheckoutDetails>>> {
    let checkouts = state.services.checkouts.list_for_account(card_id).await?;
    Ok(Json(checkouts))
}

/// Check out a copy of an item
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "checkouts",
    request_body = CreateCheckout,
    responses(
        (status = 201, description = "Item checked out", body = CheckoutCreated),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "No copy available", body = crate::error::ErrorResponse),
        (status = 404, description = "Item or account not found")
    )
)]
pub async fn create_checkout(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<CreateCheckout>,
) -> AppResult<(StatusCode, Json<CheckoutCreated>)> {
    let checkout = state.services.checkouts.checkout(request).await?;
    Ok((StatusCode::CREATED, Json(checkout.into())))
}

/// Return a checked out item
#[utoipa::path(
    delete,
    path = "/checkout/{id}",
    tag = "checkouts",
    params(
        ("id" = i32, Path, description = "Checkout ID")
    ),
    responses(
        (status = 200, description = "Item returned", body = ReturnResponse),
        (status = 404, description = "Checkout not found")
    )
)]
pub async fn return_checkout(
    State(state): State<crate::AppState>,
    Path(checkout_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let (checkout, copies_available) = state.services.checkouts.return_item(checkout_id).await?;

    Ok(Json(ReturnResponse {
        message: "Item returned successfully".to_string(),
        checkout_id: checkout.id,
        item_id: checkout.item_id,
        copies_available,
    }))
}

//! Reservation queue endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::reservation::{CancelReservation, CreateReservation, Reservation, UpdateReservation},
};

use super::{checkouts::CheckoutCreated, MessageResponse, ValidatedJson};

/// Reservation created response
#[derive(Serialize, ToSchema)]
pub struct ReservationCreated {
    pub message: String,
    #[serde(rename = "ReservationID")]
    pub reservation_id: i32,
    #[serde(rename = "PlaceInLine")]
    pub place_in_line: i32,
}

/// Get reservations held by a card
#[utoipa::path(
    get,
    path = "/reservations/person/{card_id}",
    tag = "reservations",
    params(
        ("card_id" = i32, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Reservations of the card", body = Vec<Reservation>),
        (status = 404, description = "No reservations for this card")
    )
)]
pub async fn get_reservations_by_person(
    State(state): State<crate::AppState>,
    Path(card_id): Path<i32>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.services.reservations.list_for_account(card_id).await?;
    Ok(Json(reservations))
}

/// Get the reservation queue of an item
#[utoipa::path(
    get,
    path = "/reservations/item/{item_id}",
    tag = "reservations",
    params(
        ("item_id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Queue ordered by place in line", body = Vec<Reservation>),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item_queue(
    State(state): State<crate::AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<Vec<Reservation>>> {
    let queue = state.services.reservations.list_for_item(item_id).await?;
    Ok(Json(queue))
}

/// Reserve an item; the reservation joins the end of the queue
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation added", body = ReservationCreated),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Item or account not found")
    )
)]
pub async fn add_reservation(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<CreateReservation>,
) -> AppResult<(StatusCode, Json<ReservationCreated>)> {
    let reservation = state.services.reservations.enqueue(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationCreated {
            message: "Reservation added successfully".to_string(),
            reservation_id: reservation.id,
            place_in_line: reservation.place_in_line,
        }),
    ))
}

/// Overwrite a reservation (administrative, other reservations are not renumbered)
#[utoipa::path(
    put,
    path = "/reservations/{id}",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated", body = Reservation),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Reservation, item or account not found"),
        (status = 409, description = "Place in line already taken for that item")
    )
)]
pub async fn update_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateReservation>,
) -> AppResult<Json<Reservation>> {
    let updated = state.services.reservations.reassign(id, request).await?;
    Ok(Json(updated))
}

/// Cancel one of the card's reservations
#[utoipa::path(
    delete,
    path = "/reservations/person/{card_id}",
    tag = "reservations",
    params(
        ("card_id" = i32, Path, description = "Card ID of the requester")
    ),
    request_body = CancelReservation,
    responses(
        (status = 200, description = "Reservation cancelled", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Reservation belongs to another card", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    Path(card_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CancelReservation>,
) -> AppResult<Json<MessageResponse>> {
    if request.card_id.is_some_and(|body_card| body_card != card_id) {
        return Err(AppError::Validation(
            "CardID in body does not match the card in the path".to_string(),
        ));
    }
    let reservation_id = request
        .reservation_id
        .ok_or_else(|| AppError::Validation("ReservationID is required".to_string()))?;

    state
        .services
        .reservations
        .dequeue(reservation_id, card_id)
        .await?;

    Ok(Json(MessageResponse::new("Reservation cancelled successfully")))
}

/// Check out the item to the holder of the first reservation in line
#[utoipa::path(
    post,
    path = "/reservations/{id}/checkout",
    tag = "reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 201, description = "Reservation turned into a checkout", body = CheckoutCreated),
        (status = 403, description = "Not first in line, or no copy available", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn checkout_reservation(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<CheckoutCreated>)> {
    let checkout = state.services.reservations.promote(id).await?;
    Ok((StatusCode::CREATED, Json(checkout.into())))
}

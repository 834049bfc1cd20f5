//! Reservation (hold queue entry) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Reservation row. Per item, `place_in_line` values form the contiguous range
/// `1..=reservation_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    #[serde(rename = "ReservationID")]
    pub id: i32,
    #[serde(rename = "ItemID")]
    pub item_id: i32,
    #[serde(rename = "CardID")]
    pub card_id: i32,
    #[serde(rename = "PlaceInLine")]
    pub place_in_line: i32,
}

impl Reservation {
    pub fn is_held_by(&self, card_id: i32) -> bool {
        self.card_id == card_id
    }

    pub fn is_first_in_line(&self) -> bool {
        self.place_in_line == 1
    }
}

/// Place a reservation at the tail of an item's queue
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    #[serde(rename = "ItemID")]
    #[validate(
        required(message = "ItemID is required"),
        range(min = 1, message = "ItemID must be positive")
    )]
    pub item_id: Option<i32>,
    #[serde(rename = "CardID")]
    #[validate(
        required(message = "CardID is required"),
        range(min = 1, message = "CardID must be positive")
    )]
    pub card_id: Option<i32>,
}

/// Administrative overwrite of a reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservation {
    #[serde(rename = "ItemID")]
    #[validate(
        required(message = "ItemID is required"),
        range(min = 1, message = "ItemID must be positive")
    )]
    pub item_id: Option<i32>,
    #[serde(rename = "CardID")]
    #[validate(
        required(message = "CardID is required"),
        range(min = 1, message = "CardID must be positive")
    )]
    pub card_id: Option<i32>,
    #[serde(rename = "PlaceInLine")]
    #[validate(
        required(message = "PlaceInLine is required"),
        range(min = 1, message = "PlaceInLine starts at 1")
    )]
    pub place_in_line: Option<i32>,
}

/// Cancel one of the caller's reservations
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelReservation {
    #[serde(rename = "ReservationID")]
    #[validate(
        required(message = "ReservationID is required"),
        range(min = 1, message = "ReservationID must be positive")
    )]
    pub reservation_id: Option<i32>,
    /// When present it must match the card in the path
    #[serde(rename = "CardID")]
    pub card_id: Option<i32>,
}

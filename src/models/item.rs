//! Item (catalog entry) model and its availability state

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Catalog item as stored in `items`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    #[serde(rename = "ItemID")]
    pub id: i32,
    #[serde(rename = "ItemType")]
    pub item_type: String,
    #[serde(rename = "Title")]
    pub title: String,
}

/// Denormalized per-item counters (`item_states`).
///
/// Rows are written only by the availability ledger. `reservation_count` is the
/// tail position of the item's reservation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemState {
    #[serde(rename = "ItemID")]
    pub item_id: i32,
    #[serde(rename = "TotalCopies")]
    pub total_copies: i32,
    #[serde(rename = "CopiesAvailable")]
    pub copies_available: i32,
    #[serde(rename = "ReservationCount")]
    pub reservation_count: i32,
}

impl ItemState {
    pub fn has_copy_available(&self) -> bool {
        self.copies_available > 0
    }

    /// Copies left once one more is checked out
    pub fn copies_after_checkout(&self) -> AppResult<i32> {
        if !self.has_copy_available() {
            return Err(AppError::NotAvailable(format!(
                "No copies of item {} are available",
                self.item_id
            )));
        }
        Ok(self.copies_available - 1)
    }

    /// Copies available once one comes back, and whether the total clipped the count
    pub fn copies_after_return(&self) -> (i32, bool) {
        let raised = self.copies_available + 1;
        if raised > self.total_copies {
            (self.total_copies, true)
        } else {
            (raised, false)
        }
    }

    /// Position handed to the next reservation placed on this item.
    ///
    /// `last_taken` is the highest position currently held, which an
    /// administrative reassign can push past `reservation_count`.
    pub fn next_place_in_line(&self, last_taken: i32) -> i32 {
        self.reservation_count.max(last_taken) + 1
    }
}

/// Item joined with its availability state
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemDetails {
    #[serde(rename = "ItemID")]
    pub id: i32,
    #[serde(rename = "ItemType")]
    pub item_type: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "TotalCopies")]
    pub total_copies: i32,
    #[serde(rename = "CopiesAvailable")]
    pub copies_available: i32,
    #[serde(rename = "ReservationCount")]
    pub reservation_count: i32,
}

impl ItemDetails {
    pub fn new(item: Item, state: ItemState) -> Self {
        Self {
            id: item.id,
            item_type: item.item_type,
            title: item.title,
            total_copies: state.total_copies,
            copies_available: state.copies_available,
            reservation_count: state.reservation_count,
        }
    }
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    /// Defaults to `book`
    #[serde(rename = "ItemType")]
    #[validate(length(min = 1, max = 32, message = "ItemType must be 1 to 32 characters"))]
    pub item_type: Option<String>,
    #[serde(rename = "Title")]
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 512, message = "Title must be 1 to 512 characters")
    )]
    pub title: Option<String>,
    #[serde(rename = "TotalCopies")]
    #[validate(
        required(message = "TotalCopies is required"),
        range(min = 0, message = "TotalCopies cannot be negative")
    )]
    pub total_copies: Option<i32>,
}

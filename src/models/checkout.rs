//! Checkout (loan) model and related types

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Open checkout from `checkouts`; the row is deleted when the copy comes back
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkout {
    #[serde(rename = "CheckoutID")]
    pub id: i32,
    #[serde(rename = "ItemID")]
    pub item_id: i32,
    #[serde(rename = "CardID")]
    pub card_id: i32,
    #[serde(rename = "BorrowDate")]
    pub borrow_date: NaiveDate,
    #[serde(rename = "ReturnByDate")]
    pub return_by_date: NaiveDate,
}

impl Checkout {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.return_by_date < today
    }
}

/// Checkout as listed for an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutDetails {
    #[serde(rename = "CheckoutID")]
    pub id: i32,
    #[serde(rename = "ItemID")]
    pub item_id: i32,
    #[serde(rename = "CardID")]
    pub card_id: i32,
    #[serde(rename = "BorrowDate")]
    pub borrow_date: NaiveDate,
    #[serde(rename = "ReturnByDate")]
    pub return_by_date: NaiveDate,
    #[serde(rename = "IsOverdue")]
    pub is_overdue: bool,
}

impl CheckoutDetails {
    pub fn new(checkout: Checkout, today: NaiveDate) -> Self {
        Self {
            is_overdue: checkout.is_overdue(today),
            id: checkout.id,
            item_id: checkout.item_id,
            card_id: checkout.card_id,
            borrow_date: checkout.borrow_date,
            return_by_date: checkout.return_by_date,
        }
    }
}

/// Create checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCheckout {
    #[serde(rename = "CardID")]
    #[validate(
        required(message = "CardID is required"),
        range(min = 1, message = "CardID must be positive")
    )]
    pub card_id: Option<i32>,
    #[serde(rename = "ItemID")]
    #[validate(
        required(message = "ItemID is required"),
        range(min = 1, message = "ItemID must be positive")
    )]
    pub item_id: Option<i32>,
    /// Defaults to today
    #[serde(rename = "BorrowDate")]
    pub borrow_date: Option<NaiveDate>,
    /// Defaults to the borrow date plus the configured loan duration
    #[serde(rename = "ReturnByDate")]
    pub return_by_date: Option<NaiveDate>,
}

/// Checkout with all defaults resolved, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckout {
    pub item_id: i32,
    pub card_id: i32,
    pub borrow_date: NaiveDate,
    pub return_by_date: NaiveDate,
}

impl NewCheckout {
    pub fn new(
        item_id: i32,
        card_id: i32,
        borrow_date: NaiveDate,
        return_by_date: NaiveDate,
    ) -> AppResult<Self> {
        if return_by_date < borrow_date {
            return Err(AppError::Validation(format!(
                "ReturnByDate {} is before BorrowDate {}",
                return_by_date, borrow_date
            )));
        }
        Ok(Self {
            item_id,
            card_id,
            borrow_date,
            return_by_date,
        })
    }

    /// Checkout starting on `today` for the default loan duration
    pub fn starting(item_id: i32, card_id: i32, today: NaiveDate, duration_days: i64) -> AppResult<Self> {
        Self::new(item_id, card_id, today, due_date(today, duration_days)?)
    }
}

/// Return-by date `duration_days` after `borrow_date`
fn due_date(borrow_date: NaiveDate, duration_days: i64) -> AppResult<NaiveDate> {
    borrow_date
        .checked_add_signed(Duration::days(duration_days))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "BorrowDate {} is too late to compute a ReturnByDate",
                borrow_date
            ))
        })
}

impl CreateCheckout {
    /// Fill in missing dates and check their order.
    ///
    /// Call only after `validate()` succeeded.
    pub fn resolve(&self, today: NaiveDate, duration_days: i64) -> AppResult<NewCheckout> {
        let (Some(item_id), Some(card_id)) = (self.item_id, self.card_id) else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };
        let borrow_date = self.borrow_date.unwrap_or(today);
        let return_by_date = match self.return_by_date {
            Some(date) => date,
            None => due_date(borrow_date, duration_days)?,
        };

        NewCheckout::new(item_id, card_id, borrow_date, return_by_date)
    }
}

//! Library account (card) model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::DeletionDenial;

/// Account row from `accounts`.
///
/// `num_checked` and `num_reserved` mirror the number of open checkout and
/// reservation rows held by the card.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    #[serde(rename = "CardID")]
    pub card_id: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "NumChecked")]
    pub num_checked: i32,
    #[serde(rename = "NumReserved")]
    pub num_reserved: i32,
    #[serde(rename = "OverdueFees")]
    #[schema(value_type = String, example = "0.00")]
    pub overdue_fees: Decimal,
}

impl Account {
    /// First reason the account cannot be closed, if any
    pub fn deletion_denial(&self) -> Option<DeletionDenial> {
        if self.num_checked != 0 {
            Some(DeletionDenial::OpenCheckouts(self.num_checked))
        } else if self.num_reserved != 0 {
            Some(DeletionDenial::OpenReservations(self.num_reserved))
        } else if !self.overdue_fees.is_zero() {
            Some(DeletionDenial::OverdueFees)
        } else {
            None
        }
    }
}

/// Create account request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccount {
    #[serde(rename = "Name")]
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 255, message = "Name must be 1 to 255 characters")
    )]
    pub name: Option<String>,
    /// Fees carried over from another system, defaults to zero
    #[serde(rename = "OverdueFees")]
    #[schema(value_type = Option<String>, example = "0.00")]
    pub overdue_fees: Option<Decimal>,
}

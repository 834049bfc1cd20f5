//! Checkout coordinator
//!
//! Moves copies between the shelf and patrons. Each public operation runs in one
//! transaction: the checkout row, the item's available count and the account's
//! `num_checked` change together or not at all.

use chrono::{NaiveDate, Utc};
use sqlx::PgConnection;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::checkout::{Checkout, CheckoutDetails, CreateCheckout, NewCheckout},
    repository::Repository,
};

#[derive(Clone)]
pub struct CheckoutCoordinator {
    repository: Repository,
    loans: LoansConfig,
}

impl CheckoutCoordinator {
    pub fn new(repository: Repository, loans: LoansConfig) -> Self {
        Self { repository, loans }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Checkout starting today for the configured loan length
    pub fn default_checkout(&self, item_id: i32, card_id: i32) -> AppResult<NewCheckout> {
        NewCheckout::starting(item_id, card_id, Self::today(), self.loans.default_duration_days)
    }

    /// Open checkouts of a card. `NotFound` when there are none.
    pub async fn list_for_account(&self, card_id: i32) -> AppResult<Vec<CheckoutDetails>> {
        let checkouts = self.repository.checkouts.list_for_account(card_id).await?;
        if checkouts.is_empty() {
            return Err(AppError::NotFound(format!(
                "No checkouts found for CardID {}",
                card_id
            )));
        }

        let today = Self::today();
        Ok(checkouts
            .into_iter()
            .map(|c| CheckoutDetails::new(c, today))
            .collect())
    }

    /// Check out one copy of an item
    pub async fn checkout(&self, request: CreateCheckout) -> AppResult<Checkout> {
        let new = request.resolve(Self::today(), self.loans.default_duration_days)?;

        let mut tx = self.repository.begin().await?;
        let checkout = self.issue(&mut tx, &new).await?;
        tx.commit().await?;

        tracing::info!(
            checkout_id = checkout.id,
            item_id = checkout.item_id,
            card_id = checkout.card_id,
            "Item checked out"
        );
        Ok(checkout)
    }

    /// Transactional body of a checkout, shared with reservation promotion.
    ///
    /// Locks the item state, then the account.
    pub(crate) async fn issue(&self, conn: &mut PgConnection, new: &NewCheckout) -> AppResult<Checkout> {
        let ledger = &self.repository.ledger;

        ledger.lock(conn, new.item_id).await?;
        self.repository.accounts.lock(conn, new.card_id).await?;

        if !ledger.has_copy_available(conn, new.item_id).await? {
            return Err(AppError::NotAvailable(format!(
                "No copies of item {} are available",
                new.item_id
            )));
        }

        let checkout = self.repository.checkouts.insert(conn, new).await?;
        ledger.decrement_available(conn, new.item_id).await?;
        self.repository
            .accounts
            .adjust_counters(conn, new.card_id, 1, 0)
            .await?;

        Ok(checkout)
    }

    /// Return a checked out copy. Returns the item's new available count.
    pub async fn return_item(&self, checkout_id: i32) -> AppResult<(Checkout, i32)> {
        let peek = self.repository.checkouts.get_by_id(checkout_id).await?;

        let mut tx = self.repository.begin().await?;
        self.repository.ledger.lock(&mut tx, peek.item_id).await?;
        let checkout = self.repository.checkouts.lock(&mut tx, checkout_id).await?;

        self.repository.checkouts.delete(&mut tx, checkout.id).await?;
        let copies = self
            .repository
            .ledger
            .increment_available(&mut tx, checkout.item_id)
            .await?;
        self.repository
            .accounts
            .adjust_counters(&mut tx, checkout.card_id, -1, 0)
            .await?;

        tx.commit().await?;

        tracing::info!(
            checkout_id,
            item_id = checkout.item_id,
            card_id = checkout.card_id,
            copies_available = copies,
            "Item returned"
        );
        Ok((checkout, copies))
    }
}

//! Reservation queue manager
//!
//! Owns `place_in_line`. Each item's queue is kept contiguous from 1 to the item's
//! `reservation_count`: new holds go to the tail, and removing a hold moves every
//! later hold of the same item up by one in the same transaction.
//!
//! Lock order inside a transaction is item state, then reservation, then account,
//! matching the checkout coordinator.

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult, Forbidden},
    models::{
        checkout::Checkout,
        reservation::{CreateReservation, Reservation, UpdateReservation},
    },
    repository::Repository,
};

use super::checkouts::CheckoutCoordinator;

#[derive(Clone)]
pub struct ReservationQueue {
    repository: Repository,
    checkouts: CheckoutCoordinator,
}

impl ReservationQueue {
    pub fn new(repository: Repository, checkouts: CheckoutCoordinator) -> Self {
        Self {
            repository,
            checkouts,
        }
    }

    /// Reservations held by a card. `NotFound` when there are none.
    pub async fn list_for_account(&self, card_id: i32) -> AppResult<Vec<Reservation>> {
        let reservations = self.repository.reservations.list_for_account(card_id).await?;
        if reservations.is_empty() {
            return Err(AppError::NotFound(format!(
                "No reservations found for CardID {}",
                card_id
            )));
        }
        Ok(reservations)
    }

    /// Queue of an existing item, head first (possibly empty)
    pub async fn list_for_item(&self, item_id: i32) -> AppResult<Vec<Reservation>> {
        self.repository.items.get_details(item_id).await?;
        self.repository.reservations.list_for_item(item_id).await
    }

    /// Add a hold at the tail of the item's queue
    pub async fn enqueue(&self, request: CreateReservation) -> AppResult<Reservation> {
        let (Some(item_id), Some(card_id)) = (request.item_id, request.card_id) else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let mut tx = self.repository.begin().await?;

        let state = self.repository.ledger.lock(&mut tx, item_id).await?;
        self.repository.accounts.lock(&mut tx, card_id).await?;

        let last_taken = self.repository.reservations.last_place(&mut tx, item_id).await?;
        let place_in_line = state.next_place_in_line(last_taken);
        let reservation = self
            .repository
            .reservations
            .insert(&mut tx, item_id, card_id, place_in_line)
            .await?;
        self.repository
            .ledger
            .set_reservation_count(&mut tx, item_id, place_in_line)
            .await?;
        self.repository
            .accounts
            .adjust_counters(&mut tx, card_id, 0, 1)
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = reservation.id,
            item_id,
            card_id,
            place_in_line,
            "Reservation queued"
        );
        Ok(reservation)
    }

    /// Cancel a hold on behalf of `requesting_card_id`
    pub async fn dequeue(&self, reservation_id: i32, requesting_card_id: i32) -> AppResult<Reservation> {
        let mut tx = self.repository.begin().await?;
        let reservation = self.lock_reservation(&mut tx, reservation_id).await?;

        if !reservation.is_held_by(requesting_card_id) {
            return Err(AppError::Forbidden(Forbidden::NotOwner {
                reservation_id,
                card_id: requesting_card_id,
            }));
        }

        let moved = self.remove(&mut tx, &reservation).await?;
        tx.commit().await?;

        tracing::info!(
            reservation_id,
            item_id = reservation.item_id,
            card_id = reservation.card_id,
            renumbered = moved,
            "Reservation cancelled"
        );
        Ok(reservation)
    }

    /// Overwrite a reservation's fields as an administrator.
    ///
    /// Neither the sibling positions nor the item and account counters are
    /// recomputed; the caller is responsible for leaving the queue consistent.
    pub async fn reassign(&self, reservation_id: i32, request: UpdateReservation) -> AppResult<Reservation> {
        let (Some(item_id), Some(card_id), Some(place_in_line)) =
            (request.item_id, request.card_id, request.place_in_line)
        else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let peek = self.repository.reservations.get_by_id(reservation_id).await?;

        let mut tx = self.repository.begin().await?;

        // Item states are always locked in ascending id order
        let (first, second) = if peek.item_id <= item_id {
            (peek.item_id, item_id)
        } else {
            (item_id, peek.item_id)
        };
        self.repository.ledger.lock(&mut tx, first).await?;
        if second != first {
            self.repository.ledger.lock(&mut tx, second).await?;
        }

        let current = self.repository.reservations.lock(&mut tx, reservation_id).await?;
        if current.item_id != peek.item_id {
            return Err(AppError::Conflict(format!(
                "Reservation {} was moved while being updated",
                reservation_id
            )));
        }
        self.repository.accounts.lock(&mut tx, card_id).await?;

        let updated = self
            .repository
            .reservations
            .overwrite(&mut tx, reservation_id, item_id, card_id, place_in_line)
            .await?;
        tx.commit().await?;

        tracing::info!(
            reservation_id,
            item_id,
            card_id,
            place_in_line,
            "Reservation overwritten"
        );
        Ok(updated)
    }

    /// Turn the head of an item's queue into a checkout for its holder
    pub async fn promote(&self, reservation_id: i32) -> AppResult<Checkout> {
        let mut tx = self.repository.begin().await?;
        let reservation = self.lock_reservation(&mut tx, reservation_id).await?;

        if !reservation.is_first_in_line() {
            return Err(AppError::Forbidden(Forbidden::NotHeadOfQueue {
                reservation_id,
                place_in_line: reservation.place_in_line,
            }));
        }

        let new = self
            .checkouts
            .default_checkout(reservation.item_id, reservation.card_id)?;
        self.remove(&mut tx, &reservation).await?;
        let checkout = self.checkouts.issue(&mut tx, &new).await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id,
            checkout_id = checkout.id,
            item_id = checkout.item_id,
            card_id = checkout.card_id,
            "Reservation promoted to checkout"
        );
        Ok(checkout)
    }

    /// Lock the reservation's item state, then the reservation itself
    async fn lock_reservation(&self, conn: &mut PgConnection, reservation_id: i32) -> AppResult<Reservation> {
        let peek = self.repository.reservations.get_by_id(reservation_id).await?;

        self.repository.ledger.lock(conn, peek.item_id).await?;
        let reservation = self.repository.reservations.lock(conn, reservation_id).await?;

        if reservation.item_id != peek.item_id {
            return Err(AppError::Conflict(format!(
                "Reservation {} was moved while being updated",
                reservation_id
            )));
        }
        Ok(reservation)
    }

    /// Delete a locked reservation and close the gap it leaves. Returns how many
    /// later holds moved up.
    async fn remove(&self, conn: &mut PgConnection, reservation: &Reservation) -> AppResult<u64> {
        let ledger = &self.repository.ledger;

        self.repository.reservations.delete(conn, reservation.id).await?;
        let moved = self
            .repository
            .reservations
            .close_gap(conn, reservation.item_id, reservation.place_in_line)
            .await?;

        let count = ledger.reservation_count(conn, reservation.item_id).await?;
        ledger
            .set_reservation_count(conn, reservation.item_id, (count - 1).max(0))
            .await?;

        self.repository
            .accounts
            .adjust_counters(conn, reservation.card_id, 0, -1)
            .await?;

        Ok(moved)
    }
}

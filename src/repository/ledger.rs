//! Availability ledger: the only writer of `item_states`
//!
//! Every method runs on the caller's transaction. [`AvailabilityLedger::lock`] takes
//! the row lock that serializes all checkout and queue mutations of one item, so
//! core operations call it before touching anything else for that item.

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::item::ItemState,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct AvailabilityLedger;

impl AvailabilityLedger {
    /// Create the state row for a freshly catalogued item
    pub async fn open(
        &self,
        conn: &mut PgConnection,
        item_id: i32,
        total_copies: i32,
    ) -> AppResult<ItemState> {
        let state = sqlx::query_as::<_, ItemState>(
            r#"
            INSERT INTO item_states (item_id, total_copies, copies_available, reservation_count)
            VALUES ($1, $2, $2, 0)
            RETURNING item_id, total_copies, copies_available, reservation_count
            "#,
        )
        .bind(item_id)
        .bind(total_copies)
        .fetch_one(&mut *conn)
        .await?;

        Ok(state)
    }

    /// Lock and return the item's state row
    pub async fn lock(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<ItemState> {
        sqlx::query_as::<_, ItemState>(
            r#"
            SELECT item_id, total_copies, copies_available, reservation_count
            FROM item_states
            WHERE item_id = $1
            FOR UPDATE
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))
    }

    /// Whether a copy could be checked out right now. Does not write.
    pub async fn has_copy_available(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<bool> {
        let copies: Option<i32> =
            sqlx::query_scalar("SELECT copies_available FROM item_states WHERE item_id = $1")
                .bind(item_id)
                .fetch_optional(&mut *conn)
                .await?;

        copies
            .map(|c| c > 0)
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))
    }

    /// Take one copy off the shelf; `NotAvailable` when none is left
    pub async fn decrement_available(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<i32> {
        let state = self.lock(conn, item_id).await?;
        let remaining = state.copies_after_checkout()?;

        sqlx::query("UPDATE item_states SET copies_available = $2 WHERE item_id = $1")
            .bind(item_id)
            .bind(remaining)
            .execute(&mut *conn)
            .await?;

        Ok(remaining)
    }

    /// Put one copy back on the shelf, never above the item's total
    pub async fn increment_available(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<i32> {
        let state = self.lock(conn, item_id).await?;
        let (copies, clamped) = state.copies_after_return();

        if clamped {
            tracing::warn!(
                item_id,
                total_copies = state.total_copies,
                "Return would exceed total copies, count kept at total"
            );
        }

        sqlx::query("UPDATE item_states SET copies_available = $2 WHERE item_id = $1")
            .bind(item_id)
            .bind(copies)
            .execute(&mut *conn)
            .await?;

        Ok(copies)
    }

    pub async fn reservation_count(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<i32> {
        sqlx::query_scalar("SELECT reservation_count FROM item_states WHERE item_id = $1")
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))
    }

    pub async fn set_reservation_count(
        &self,
        conn: &mut PgConnection,
        item_id: i32,
        count: i32,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE item_states SET reservation_count = $2 WHERE item_id = $1")
            .bind(item_id)
            .bind(count)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item {} not found", item_id)));
        }
        Ok(())
    }
}

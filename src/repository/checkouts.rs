//! Checkouts repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::checkout::{Checkout, NewCheckout},
};

#[derive(Clone)]
pub struct CheckoutsRepository {
    pool: Pool<Postgres>,
}

impl CheckoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get checkout by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Checkout with id {} not found", id)))
    }

    /// Lock a checkout row; a concurrent return that got there first makes this `NotFound`
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Checkout with id {} not found", id)))
    }

    /// Open checkouts for a card, oldest first
    pub async fn list_for_account(&self, card_id: i32) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            "SELECT * FROM checkouts WHERE card_id = $1 ORDER BY borrow_date, id",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(checkouts)
    }

    pub async fn insert(&self, conn: &mut PgConnection, checkout: &NewCheckout) -> AppResult<Checkout> {
        let created = sqlx::query_as::<_, Checkout>(
            r#"
            INSERT INTO checkouts (item_id, card_id, borrow_date, return_by_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(checkout.item_id)
        .bind(checkout.card_id)
        .bind(checkout.borrow_date)
        .bind(checkout.return_by_date)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM checkouts WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

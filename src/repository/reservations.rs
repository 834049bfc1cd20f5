//! Reservations repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::reservation::Reservation,
};

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Reservations held by a card
    pub async fn list_for_account(&self, card_id: i32) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE card_id = $1 ORDER BY item_id, place_in_line",
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// An item's queue, head first
    pub async fn list_for_item(&self, item_id: i32) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE item_id = $1 ORDER BY place_in_line",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Highest position held in an item's queue, 0 when it is empty
    pub async fn last_place(&self, conn: &mut PgConnection, item_id: i32) -> AppResult<i32> {
        let last: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(place_in_line), 0) FROM reservations WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(last)
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        item_id: i32,
        card_id: i32,
        place_in_line: i32,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (item_id, card_id, place_in_line)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(card_id)
        .bind(place_in_line)
        .fetch_one(&mut *conn)
        .await?;

        Ok(reservation)
    }

    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Move everyone behind `vacated_place` one step forward. Returns how many moved.
    pub async fn close_gap(
        &self,
        conn: &mut PgConnection,
        item_id: i32,
        vacated_place: i32,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET place_in_line = place_in_line - 1
            WHERE item_id = $1 AND place_in_line > $2
            "#,
        )
        .bind(item_id)
        .bind(vacated_place)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Write all fields of a reservation as given, touching nothing else.
    ///
    /// The (item, place) uniqueness is checked immediately so a collision surfaces
    /// here as `Conflict` instead of failing the commit.
    pub async fn overwrite(
        &self,
        conn: &mut PgConnection,
        id: i32,
        item_id: i32,
        card_id: i32,
        place_in_line: i32,
    ) -> AppResult<Reservation> {
        sqlx::query("SET CONSTRAINTS reservations_item_place_unique IMMEDIATE")
            .execute(&mut *conn)
            .await?;

        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET item_id = $2, card_id = $3, place_in_line = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(item_id)
        .bind(card_id)
        .bind(place_in_line)
        .fetch_optional(&mut *conn)
        .await;

        match updated {
            Ok(Some(reservation)) => Ok(reservation),
            Ok(None) => Err(AppError::NotFound(format!("Reservation with id {} not found", id))),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "Item {} already has a reservation at place {}",
                    item_id, place_in_line
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}

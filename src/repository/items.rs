//! Items repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{Item, ItemDetails},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item with its availability by ID
    pub async fn get_details(&self, id: i32) -> AppResult<ItemDetails> {
        sqlx::query_as::<_, ItemDetails>(
            r#"
            SELECT i.id, i.item_type, i.title,
                   s.total_copies, s.copies_available, s.reservation_count
            FROM items i
            JOIN item_states s ON s.item_id = i.id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Insert the catalog row. The caller opens the item's state in the same transaction.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        item_type: &str,
        title: &str,
    ) -> AppResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (item_type, title) VALUES ($1, $2) RETURNING id, item_type, title",
        )
        .bind(item_type)
        .bind(title)
        .fetch_one(&mut *conn)
        .await?;

        Ok(item)
    }
}

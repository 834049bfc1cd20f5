//! Accounts repository for database operations

use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::account::Account,
};

const ACCOUNT_COLUMNS: &str = "card_id, name, num_checked, num_reserved, overdue_fees";

#[derive(Clone)]
pub struct AccountsRepository {
    pool: Pool<Postgres>,
}

impl AccountsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get account by card ID
    pub async fn get_by_id(&self, card_id: i32) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE card_id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account with CardID {} not found", card_id)))
    }

    /// Lock the account row for the rest of the transaction
    pub async fn lock(&self, conn: &mut PgConnection, card_id: i32) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM accounts WHERE card_id = $1 FOR UPDATE",
            ACCOUNT_COLUMNS
        ))
        .bind(card_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account with CardID {} not found", card_id)))
    }

    /// Create a new account with zeroed counters
    pub async fn create(&self, name: &str, overdue_fees: Decimal) -> AppResult<Account> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (name, overdue_fees) VALUES ($1, $2) RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(name)
        .bind(overdue_fees)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    /// Shift the checkout and reservation counters by the given deltas.
    ///
    /// The table's CHECK constraints reject a counter going below zero.
    pub async fn adjust_counters(
        &self,
        conn: &mut PgConnection,
        card_id: i32,
        checked_delta: i32,
        reserved_delta: i32,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET num_checked = num_checked + $2,
                num_reserved = num_reserved + $3
            WHERE card_id = $1
            "#,
        )
        .bind(card_id)
        .bind(checked_delta)
        .bind(reserved_delta)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account with CardID {} not found", card_id)));
        }
        Ok(())
    }

    pub async fn delete(&self, conn: &mut PgConnection, card_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM accounts WHERE card_id = $1")
            .bind(card_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

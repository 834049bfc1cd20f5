//! Repository layer for database operations
//!
//! Reads go straight to the pool. Writes that belong to a core operation take the
//! caller's `&mut PgConnection`, which is the connection of an open transaction
//! obtained from [`Repository::begin`].

pub mod accounts;
pub mod checkouts;
pub mod items;
pub mod ledger;
pub mod reservations;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub items: items::ItemsRepository,
    pub ledger: ledger::AvailabilityLedger,
    pub accounts: accounts::AccountsRepository,
    pub checkouts: checkouts::CheckoutsRepository,
    pub reservations: reservations::ReservationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            ledger: ledger::AvailabilityLedger,
            accounts: accounts::AccountsRepository::new(pool.clone()),
            checkouts: checkouts::CheckoutsRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a transaction. Dropping it without `commit()` rolls everything back.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Round-trip to the database, used by the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

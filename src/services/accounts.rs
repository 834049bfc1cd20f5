//! Account registration and the deletion guard

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::account::{Account, CreateAccount},
    repository::Repository,
};

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
}

impl AccountsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, card_id: i32) -> AppResult<Account> {
        self.repository.accounts.get_by_id(card_id).await
    }

    pub async fn create(&self, request: CreateAccount) -> AppResult<Account> {
        let name = request
            .name
            .ok_or_else(|| AppError::Validation("Name is required".to_string()))?;
        let fees = request.overdue_fees.unwrap_or(Decimal::ZERO);
        if fees.is_sign_negative() {
            return Err(AppError::Validation("OverdueFees cannot be negative".to_string()));
        }

        let account = self.repository.accounts.create(name.trim(), fees).await?;
        tracing::info!(card_id = account.card_id, "Account created");
        Ok(account)
    }

    /// Whether the account could be deleted now, with the blocking reason as the error
    pub async fn can_delete(&self, card_id: i32) -> AppResult<()> {
        let account = self.repository.accounts.get_by_id(card_id).await?;
        match account.deletion_denial() {
            Some(reason) => Err(AppError::DeletionDenied(reason)),
            None => Ok(()),
        }
    }

    /// Delete an account that holds no checkouts, reservations or fees
    pub async fn delete(&self, card_id: i32) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        let account = self.repository.accounts.lock(&mut tx, card_id).await?;
        if let Some(reason) = account.deletion_denial() {
            tracing::debug!(card_id, %reason, "Account deletion refused");
            return Err(AppError::DeletionDenied(reason));
        }

        self.repository.accounts.delete(&mut tx, card_id).await?;
        tx.commit().await?;

        tracing::info!(card_id, "Account deleted");
        Ok(())
    }
}

//! Business logic services

pub mod accounts;
pub mod catalog;
pub mod checkouts;
pub mod reservations;

use crate::{config::LoansConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub accounts: accounts::AccountsService,
    pub checkouts: checkouts::CheckoutCoordinator,
    pub reservations: reservations::ReservationQueue,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig) -> Self {
        let checkouts = checkouts::CheckoutCoordinator::new(repository.clone(), loans_config);

        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            accounts: accounts::AccountsService::new(repository.clone()),
            reservations: reservations::ReservationQueue::new(repository.clone(), checkouts.clone()),
            checkouts,
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

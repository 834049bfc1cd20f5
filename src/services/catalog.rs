//! Catalog service: registers items together with their availability state

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, ItemDetails},
    repository::Repository,
};

const DEFAULT_ITEM_TYPE: &str = "book";

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get item with its availability counters
    pub async fn get_item(&self, id: i32) -> AppResult<ItemDetails> {
        self.repository.items.get_details(id).await
    }

    /// Create an item; all of its copies start on the shelf
    pub async fn create_item(&self, request: CreateItem) -> AppResult<ItemDetails> {
        let (Some(title), Some(total_copies)) = (request.title, request.total_copies) else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };
        let item_type = request
            .item_type
            .unwrap_or_else(|| DEFAULT_ITEM_TYPE.to_string());

        let mut tx = self.repository.begin().await?;
        let item = self
            .repository
            .items
            .create(&mut tx, &item_type, title.trim())
            .await?;
        let state = self
            .repository
            .ledger
            .open(&mut tx, item.id, total_copies)
            .await?;
        tx.commit().await?;

        tracing::info!(item_id = item.id, total_copies, "Item catalogued");
        Ok(ItemDetails::new(item, state))
    }
}

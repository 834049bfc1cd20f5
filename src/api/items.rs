//! Catalog item endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::item::{CreateItem, ItemDetails},
};

use super::ValidatedJson;

/// Get item details and availability by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.catalog.get_item(id).await?;
    Ok(Json(item))
}

/// Create a new catalog item with its copies
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = ItemDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    ValidatedJson(item): ValidatedJson<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemDetails>)> {
    let created = state.services.catalog.create_item(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

//! Account endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::account::{Account, CreateAccount},
};

use super::{MessageResponse, ValidatedJson};

/// Create a library account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    request_body = CreateAccount,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_account(
    State(state): State<crate::AppState>,
    ValidatedJson(account): ValidatedJson<CreateAccount>,
) -> AppResult<(StatusCode, Json<Account>)> {
    let created = state.services.accounts.create(account).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get account details and counters
#[utoipa::path(
    get,
    path = "/accounts/person/{card_id}",
    tag = "accounts",
    params(
        ("card_id" = i32, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<crate::AppState>,
    Path(card_id): Path<i32>,
) -> AppResult<Json<Account>> {
    let account = state.services.accounts.get_by_id(card_id).await?;
    Ok(Json(account))
}

/// Check whether an account could be deleted now
#[utoipa::path(
    get,
    path = "/accounts/person/{card_id}/deletable",
    tag = "accounts",
    params(
        ("card_id" = i32, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Account can be deleted", body = MessageResponse),
        (status = 403, description = "Open checkouts, reservations or fees", body = crate::error::ErrorResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn can_delete_account(
    State(state): State<crate::AppState>,
    Path(card_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.accounts.can_delete(card_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Account {} can be deleted",
        card_id
    ))))
}

/// Delete an account with no outstanding checkouts, reservations or fees
#[utoipa::path(
    delete,
    path = "/accounts/person/{card_id}",
    tag = "accounts",
    params(
        ("card_id" = i32, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Open checkouts, reservations or fees", body = crate::error::ErrorResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    State(state): State<crate::AppState>,
    Path(card_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.accounts.delete(card_id).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

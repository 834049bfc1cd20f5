//! Error types for the library records server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 3,
    NotFound = 5,
    ItemNotAvailable = 7,
    Duplicate = 8,
    BadValue = 18,
    NotReservationOwner = 22,
    NotHeadOfQueue = 23,
    AccountHasCheckouts = 24,
    AccountHasReservations = 25,
    AccountHasOverdueFees = 26,
}

/// Why an account may not be deleted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionDenial {
    OpenCheckouts(i32),
    OpenReservations(i32),
    OverdueFees,
}

impl DeletionDenial {
    pub fn code(&self) -> ErrorCode {
        match self {
            DeletionDenial::OpenCheckouts(_) => ErrorCode::AccountHasCheckouts,
            DeletionDenial::OpenReservations(_) => ErrorCode::AccountHasReservations,
            DeletionDenial::OverdueFees => ErrorCode::AccountHasOverdueFees,
        }
    }
}

impl std::fmt::Display for DeletionDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletionDenial::OpenCheckouts(n) => {
                write!(f, "Account still has {} checked out item(s)", n)
            }
            DeletionDenial::OpenReservations(n) => {
                write!(f, "Account still has {} active reservation(s)", n)
            }
            DeletionDenial::OverdueFees => write!(f, "Account has unpaid overdue fees"),
        }
    }
}

/// Reasons a caller is refused an operation on a reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forbidden {
    NotOwner { reservation_id: i32, card_id: i32 },
    NotHeadOfQueue { reservation_id: i32, place_in_line: i32 },
}

impl Forbidden {
    pub fn code(&self) -> ErrorCode {
        match self {
            Forbidden::NotOwner { .. } => ErrorCode::NotReservationOwner,
            Forbidden::NotHeadOfQueue { .. } => ErrorCode::NotHeadOfQueue,
        }
    }
}

impl std::fmt::Display for Forbidden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Forbidden::NotOwner { reservation_id, card_id } => write!(
                f,
                "Reservation {} does not belong to card {}",
                reservation_id, card_id
            ),
            Forbidden::NotHeadOfQueue { reservation_id, place_in_line } => write!(
                f,
                "Reservation {} is number {} in line, only the first can be checked out",
                reservation_id, place_in_line
            ),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not available: {0}")]
    NotAvailable(String),

    #[error("Forbidden: {0}")]
    Forbidden(Forbidden),

    #[error("Deletion denied: {0}")]
    DeletionDenied(DeletionDenial),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    /// HTTP status and code for this error
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::NotAvailable(_) => (StatusCode::FORBIDDEN, ErrorCode::ItemNotAvailable),
            AppError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason.code()),
            AppError::DeletionDenied(reason) => (StatusCode::FORBIDDEN, reason.code()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::NotAvailable(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Forbidden(reason) => reason.to_string(),
            AppError::DeletionDenied(reason) => reason.to_string(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                format!("Database error: {}", e)
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

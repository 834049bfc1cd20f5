//! Library Records Server
//!
//! REST JSON API over a library's items, accounts, checkouts and reservation
//! queues. Copy availability, queue positions and per-account counters are kept
//! consistent by running every multi-table change in a single transaction.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

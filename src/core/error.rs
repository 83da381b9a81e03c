use thiserror::Error;

use crate::core::validation::ValidationError;

/// Centralized error type for flow execution.
///
/// Everything a flow can fail on is converted into this enum so the
/// dispatcher has a single boundary to catch, log and answer at.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Contact payload rejected by validation
    #[error("Contact validation error: {0}")]
    Contact(#[from] ValidationError),

    /// Anything that does not fit the variants above
    #[error("{0}")]
    Other(String),
}

//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Document store error: {0}")]
    Store(String),

    #[error("Authentication required: {0}")]
    Auth(String),

    /// Required form field missing or blank.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Invalid month token '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("UI error: {0}")]
    Ui(String),
}

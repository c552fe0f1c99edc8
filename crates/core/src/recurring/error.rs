//! Recurring scheduler error types.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use saldo_shared::AppError;

/// Errors from recurring template handling.
#[derive(Debug, Error)]
pub enum RecurringError {
    /// Template not found.
    #[error("Recurring template not found: {0}")]
    TemplateNotFound(Uuid),

    /// Template has no lines to generate from.
    #[error("Recurring template has no lines")]
    EmptyTemplate,

    /// Advancing the run date left the representable range.
    #[error("Cannot advance run date from {0}")]
    DateOverflow(NaiveDate),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl RecurringError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::EmptyTemplate => "EMPTY_TEMPLATE",
            Self::DateOverflow(_) => "DATE_OVERFLOW",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<RecurringError> for AppError {
    fn from(err: RecurringError) -> Self {
        match err {
            RecurringError::TemplateNotFound(_) => Self::NotFound(err.to_string()),
            RecurringError::Database(msg) => Self::Database(msg),
            _ => Self::Validation(err.to_string()),
        }
    }
}

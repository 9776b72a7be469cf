use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::ledger::Frequency;

pub type Result<T> = std::result::Result<T, RecurrenceError>;

/// Error type that captures recurrence, validation, and persistence failures.
#[derive(Debug, Error)]
pub enum RecurrenceError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid frequency `{0}` (expected daily, weekly, monthly or yearly)")]
    InvalidFrequency(String),
    #[error("Cannot advance {from} by one {frequency} period: date out of range")]
    DateOutOfRange {
        from: NaiveDate,
        frequency: Frequency,
    },
    #[error("Template not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("Template {template_id} was advanced concurrently (expected next due {expected}, found {found})")]
    Conflict {
        template_id: Uuid,
        expected: NaiveDate,
        found: NaiveDate,
    },
    #[error("Instance for template {template_id} on {date} already exists")]
    DuplicateInstance { template_id: Uuid, date: NaiveDate },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl RecurrenceError {
    /// Whether a caller may retry the failed operation after reloading state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RecurrenceError::Conflict { .. } | RecurrenceError::Io(_))
    }
}

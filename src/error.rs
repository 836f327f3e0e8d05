//! Error types for drafts, gestures, and project storage.

use thiserror::Error;
use uuid::Uuid;

/// Errors returned while validating a new activity before it joins the schedule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("activity name must not be empty")]
    EmptyName,

    #[error("activity start date is required")]
    MissingStart,

    #[error("activity end date is required")]
    MissingEnd,

    #[error("activity ends ({end}) before it starts ({start})")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Reasons a gesture could not begin. Callers treat all of them as no-ops.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GestureError {
    #[error("schedule is read-only for the acting user")]
    ReadOnly,

    #[error("task {0} is not in the schedule")]
    UnknownTask(Uuid),

    #[error("another gesture is already in progress")]
    GestureInProgress,
}

/// Errors raised while reading or writing project files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found {found:?}); need task name, start date, end date")]
    MissingColumns { found: Vec<String> },

    #[error("no valid tasks found in CSV ({skipped} rows skipped)")]
    NoRows { skipped: usize },
}

//! Error types for board domain validation and ingestion.

use super::TaskId;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while constructing validated scalar values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The column title is empty after trimming.
    #[error("column title must not be empty")]
    EmptyColumnTitle,
}

/// Form-level validation failures, raised before any store mutation or
/// network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The task title is missing or blank.
    #[error("task title is required")]
    MissingTitle,

    /// The due date is missing.
    #[error("due date is required")]
    MissingDueDate,

    /// The requested status does not name an existing column.
    #[error("no column titled '{0}' exists")]
    UnknownColumn(String),
}

/// Errors returned by column registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColumnError {
    /// The column title is blank.
    #[error("column title must not be blank")]
    BlankTitle,

    /// A column with the same title already exists.
    #[error("column '{0}' already exists")]
    DuplicateTitle(String),

    /// Default columns cannot be removed.
    #[error("default column '{0}' cannot be removed")]
    DefaultColumn(String),

    /// No column with the given title exists.
    #[error("column '{0}' not found")]
    NotFound(String),
}

/// Errors returned by task store insertion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStoreError {
    /// A task with the same identifier is already present.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),
}

/// Errors returned while canonicalizing a raw record's identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Neither identifier field carries a usable value.
    #[error("record has no task identifier")]
    MissingId,

    /// The identifier field holds a value that cannot be an identifier.
    #[error("invalid task identifier value: {0}")]
    InvalidId(String),
}

/// Errors returned while turning a raw record into a task.
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// The record identity could not be canonicalized.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The record fields do not match the task record shape.
    #[error("malformed task record: {0}")]
    Malformed(Arc<serde_json::Error>),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(Arc::new(err))
    }
}

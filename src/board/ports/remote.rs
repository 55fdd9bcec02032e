//! Remote task collaborator port.
//!
//! The collaborator owns durable task storage. Every operation addresses a
//! single task by canonical identifier; records it returns are raw and must
//! pass through the identity normalizer before use.

use crate::board::domain::{RawTaskRecord, TaskFields, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote collaborator operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// CRUD contract of the remote task collaborator.
#[async_trait]
pub trait TaskRemote: Send + Sync {
    /// Lists the active tasks.
    async fn list_tasks(&self) -> RemoteResult<Vec<RawTaskRecord>>;

    /// Creates a task and returns the stored record, carrying the
    /// identifier the collaborator assigned.
    async fn create_task(&self, fields: &TaskFields) -> RemoteResult<RawTaskRecord>;

    /// Replaces the fields of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when the task does not exist.
    async fn update_task(&self, id: &TaskId, fields: &TaskFields) -> RemoteResult<()>;

    /// Deletes an active task.
    async fn delete_task(&self, id: &TaskId) -> RemoteResult<()>;

    /// Moves a task to the archive.
    async fn archive_task(&self, id: &TaskId) -> RemoteResult<()>;

    /// Lists the archived tasks.
    async fn list_archived_tasks(&self) -> RemoteResult<Vec<RawTaskRecord>>;

    /// Moves an archived task back to the active list.
    async fn restore_task(&self, id: &TaskId) -> RemoteResult<()>;

    /// Deletes an archived task for good.
    async fn permanently_delete_task(&self, id: &TaskId) -> RemoteResult<()>;
}

/// Errors returned by remote collaborator implementations.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The collaborator could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The caller is not authenticated.
    #[error("unauthorized")]
    Unauthorized,

    /// The caller is authenticated but not allowed to perform the call.
    #[error("forbidden")]
    Forbidden,

    /// The addressed task does not exist remotely.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The collaborator refused the call.
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Message reported by the collaborator.
        message: String,
    },

    /// The collaborator answered with a body that could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(Arc<serde_json::Error>),

    /// Any other collaborator failure.
    #[error("backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Returns `true` when repeating the call might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Backend(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::Unauthorized | Self::Forbidden | Self::NotFound(_) | Self::Malformed(_) => false,
        }
    }

    /// Returns `true` when the collaborator rejected the caller's
    /// credentials or permissions.
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(Arc::new(err))
    }
}

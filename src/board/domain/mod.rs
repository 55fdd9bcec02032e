//! Domain model for the task board.
//!
//! The board domain models tasks, the columns grouping them, the archive,
//! and the search overlay while keeping the remote task service outside of
//! the domain boundary. Records from the service enter through
//! [`normalize`] and [`ingest`]; nothing past that point sees more than one
//! identifier field.

mod archive;
mod column;
mod decoration;
mod error;
mod form;
mod identity;
mod ids;
mod notification;
mod record;
mod search;
mod task;
mod task_store;

pub use archive::{ArchiveRecord, ArchiveStore, Restored};
pub use column::{Column, ColumnKind, ColumnRegistry, ColumnRemoval, DefaultColumn};
pub use decoration::Decoration;
pub use error::{
    BoardDomainError, ColumnError, IdentityError, IngestError, TaskStoreError, ValidationError,
};
pub use form::{NewTask, ValidatedNewTask};
pub use identity::{CANONICAL_ID_FIELD, LEGACY_ID_FIELD, RawTaskRecord, ingest, normalize};
pub use ids::{ColumnTitle, ProvisionalIds, TaskId};
pub use notification::{
    NewNotification, Notification, NotificationId, NotificationKind, Notifications,
};
pub use record::{TaskFields, TaskRecord};
pub use search::{SearchQuery, TaskFilter, available_categories, available_statuses, filter};
pub use task::{Task, TaskData, TaskPatch};
pub use task_store::TaskStore;

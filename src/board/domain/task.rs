//! Task entity and partial updates.

use super::{ColumnTitle, TaskId, TaskRecord};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A task on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: ColumnTitle,
    due_date: Option<NaiveDate>,
    created_date: NaiveDate,
    category: Option<String>,
    last_modified: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
}

/// Parameter object for constructing a task from validated form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial status.
    pub status: ColumnTitle,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Optional category.
    pub category: Option<String>,
}

impl Task {
    /// Creates a task stamped with the current clock time.
    #[must_use]
    pub fn new(data: TaskData, clock: &impl Clock) -> Self {
        let now = clock.utc();
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            created_date: now.date_naive(),
            category: data.category,
            last_modified: now,
            archived_at: None,
        }
    }

    /// Builds a task from a decoded remote record.
    ///
    /// A missing or blank status falls back to "To Do"; a missing creation
    /// date or modification time falls back to the clock.
    #[must_use]
    pub fn from_record(record: TaskRecord, clock: &impl Clock) -> Self {
        let now = clock.utc();
        let status = record
            .status
            .and_then(|status| ColumnTitle::new(status).ok())
            .unwrap_or_else(ColumnTitle::to_do);
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            status,
            due_date: record.due_date,
            created_date: record.created_date.unwrap_or_else(|| now.date_naive()),
            category: record.category,
            last_modified: record.last_modified.unwrap_or(now),
            archived_at: record.archived_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status, the title of the column holding the task.
    #[must_use]
    pub const fn status(&self) -> &ColumnTitle {
        &self.status
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation date.
    #[must_use]
    pub const fn created_date(&self) -> NaiveDate {
        self.created_date
    }

    /// Returns the category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns the archive timestamp; present only while archived.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns `true` when the due date lies strictly before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }

    /// Merges the patch into this task and refreshes `last_modified`.
    pub fn apply(&mut self, patch: TaskPatch, clock: &impl Clock) {
        let TaskPatch {
            title,
            description,
            status,
            due_date,
            category,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        if let Some(category) = category {
            self.category = category;
        }
        self.touch(clock);
    }

    pub(crate) fn mark_archived(&mut self, clock: &impl Clock) -> DateTime<Utc> {
        let archived_at = clock.utc();
        self.archived_at = Some(archived_at);
        archived_at
    }

    pub(crate) fn restamp_archived(&mut self, archived_at: DateTime<Utc>) {
        self.archived_at = Some(archived_at);
    }

    pub(crate) fn clear_archived(&mut self, clock: &impl Clock) {
        self.archived_at = None;
        self.touch(clock);
    }

    pub(crate) fn reassign(&mut self, status: ColumnTitle, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    pub(crate) fn rekey(&mut self, id: TaskId) {
        self.id = id;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.last_modified = clock.utc();
    }
}

/// Partial update merged into an existing task.
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<ColumnTitle>,
    due_date: Option<Option<NaiveDate>>,
    category: Option<Option<String>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a patch changing only the status.
    #[must_use]
    pub fn status_only(status: ColumnTitle) -> Self {
        Self::new().with_status(status)
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: ColumnTitle) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets or clears the category.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns the new title, if the patch sets one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the new status, if the patch sets one.
    #[must_use]
    pub const fn status(&self) -> Option<&ColumnTitle> {
        self.status.as_ref()
    }

    /// Returns `true` when the patch clears the due date.
    #[must_use]
    pub const fn clears_due_date(&self) -> bool {
        matches!(self.due_date, Some(None))
    }
}

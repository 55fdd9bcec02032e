//! Board coordinator.
//!
//! [`Board`] owns the task store, column registry, archive and search
//! overlay. User intents are applied to the local stores at once and the
//! matching remote call is dispatched through [`RemoteSync`]; failures come
//! back as events and surface as notifications without touching local
//! state.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{
    domain::{
        ArchiveRecord, ArchiveStore, Column, ColumnError, ColumnRegistry, ColumnRemoval,
        ColumnTitle, Decoration, NewNotification, NewTask, NotificationId, NotificationKind,
        Notifications, ProvisionalIds, RawTaskRecord, SearchQuery, Task, TaskData, TaskFields,
        TaskFilter, TaskId, TaskPatch, TaskStore, TaskStoreError, ValidationError, ingest,
    },
    ports::{RemoteError, RemoteResult, TaskRemote},
    services::{RemoteSync, SyncEvent, SyncOp},
};
use crate::config::BoardConfig;

const REFRESH: &str = "refresh tasks";

/// Errors returned by board intents.
///
/// Remote failures are never returned; they become notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Input failed validation; nothing was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A column operation was rejected; nothing was changed.
    #[error(transparent)]
    Column(#[from] ColumnError),
    /// A store insertion was rejected; nothing was changed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for board intents.
pub type BoardResult<T> = Result<T, BoardError>;

/// One column of the rendered board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView<'a> {
    /// The column.
    pub column: &'a Column,
    /// Its decoration.
    pub decoration: Decoration,
    /// Tasks shown in the column.
    pub tasks: Vec<&'a Task>,
}

/// Outcome of a reconciling fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Active tasks loaded.
    pub active: usize,
    /// Archived tasks loaded.
    pub archived: usize,
    /// Records skipped because they could not be ingested.
    pub skipped: usize,
    /// Columns added because fetched tasks referenced them.
    pub added_columns: Vec<ColumnTitle>,
}

/// The board state coordinator.
pub struct Board<R, C>
where
    R: TaskRemote + 'static,
    C: Clock + Send + Sync,
{
    tasks: TaskStore,
    columns: ColumnRegistry,
    archive: ArchiveStore,
    query: SearchQuery,
    notifications: Notifications,
    failed_ops: HashMap<NotificationId, SyncOp>,
    sync: RemoteSync<R>,
    provisional_ids: ProvisionalIds,
    custom_columns: Vec<String>,
    clock: Arc<C>,
}

impl<R, C> Board<R, C>
where
    R: TaskRemote + 'static,
    C: Clock + Send + Sync,
{
    /// Creates an empty board with the default columns.
    #[must_use]
    pub fn new(remote: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            tasks: TaskStore::new(),
            columns: ColumnRegistry::new(),
            archive: ArchiveStore::new(),
            query: SearchQuery::new(),
            notifications: Notifications::default(),
            failed_ops: HashMap::new(),
            sync: RemoteSync::new(remote),
            provisional_ids: ProvisionalIds::new(),
            custom_columns: Vec::new(),
            clock,
        }
    }

    /// Creates an empty board with the configured columns and notification
    /// capacity. Blank or duplicate column titles are skipped.
    #[must_use]
    pub fn with_config(remote: Arc<R>, clock: Arc<C>, config: &BoardConfig) -> Self {
        let mut board = Self::new(remote, clock);
        board.notifications = Notifications::with_capacity(config.notification_capacity);
        board.custom_columns.clone_from(&config.custom_columns);
        board.seed_custom_columns();
        board
    }

    /// Returns the active tasks.
    #[must_use]
    pub const fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Returns the columns.
    #[must_use]
    pub const fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    /// Returns the archived tasks.
    #[must_use]
    pub const fn archive(&self) -> &ArchiveStore {
        &self.archive
    }

    /// Returns the current search query.
    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Returns the queued notifications.
    #[must_use]
    pub const fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Returns the number of remote calls whose outcome is still pending.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.sync.in_flight()
    }

    /// Returns `true` when a non-blank search term is set.
    #[must_use]
    pub fn is_search_active(&self) -> bool {
        self.query.is_active()
    }

    /// Returns the search overlay's result; empty while no term is set.
    #[must_use]
    pub fn search_results(&self) -> Vec<&Task> {
        self.query.apply(&self.tasks)
    }

    /// Returns the tasks shown in the column titled `title`.
    ///
    /// While a search is active the overlay's result is narrowed to the
    /// column; otherwise the raw store is.
    #[must_use]
    pub fn column_view(&self, title: &str) -> Vec<&Task> {
        if self.is_search_active() {
            self.search_results()
                .into_iter()
                .filter(|task| task.status() == title)
                .collect()
        } else {
            self.tasks.with_status(title)
        }
    }

    /// Returns every column in board order with its decoration and tasks.
    #[must_use]
    pub fn board_view(&self) -> Vec<ColumnView<'_>> {
        self.columns
            .iter()
            .map(|column| ColumnView {
                column,
                decoration: column.decoration(),
                tasks: self.column_view(column.title().as_str()),
            })
            .collect()
    }

    /// Validates form input and inserts the task at once under a
    /// provisional identifier, then dispatches the create call.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] when a required field is missing
    /// or the requested status names no column.
    pub fn create_task(&mut self, input: NewTask) -> BoardResult<TaskId> {
        let valid = input.validate()?;
        let status = match valid.status {
            Some(status) if self.columns.contains(status.as_str()) => status,
            Some(status) => return Err(ValidationError::UnknownColumn(status.into()).into()),
            None => ColumnTitle::to_do(),
        };

        let id = self.provisional_ids.next(&*self.clock);
        let task = Task::new(
            TaskData {
                id: id.clone(),
                title: valid.title,
                description: valid.description,
                status,
                due_date: Some(valid.due_date),
                category: valid.category,
            },
            &*self.clock,
        );
        let fields = TaskFields::from(&task);
        self.tasks.add(task)?;
        self.sync.dispatch(SyncOp::Create {
            provisional: id.clone(),
            fields,
        });
        Ok(id)
    }

    /// Merges `patch` into the task and dispatches an update.
    ///
    /// Returns `Ok(false)` when no active task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] when the patch blanks the title,
    /// clears the due date, or names a status with no column.
    pub fn edit_task(&mut self, id: &TaskId, patch: TaskPatch) -> BoardResult<bool> {
        if patch.title().is_some_and(|title| title.trim().is_empty()) {
            return Err(ValidationError::MissingTitle.into());
        }
        if patch.clears_due_date() {
            return Err(ValidationError::MissingDueDate.into());
        }
        if let Some(status) = patch.status() {
            self.require_column(status.as_str())?;
        }

        let Some(fields) = self
            .tasks
            .update(id, patch, &*self.clock)
            .map(TaskFields::from)
        else {
            debug!(task_id = %id, "edit addressed a task that is gone");
            return Ok(false);
        };
        self.sync.dispatch(SyncOp::Update {
            id: id.clone(),
            fields,
        });
        Ok(true)
    }

    /// Moves the task to the column titled `status`.
    ///
    /// Returns `Ok(false)` when no active task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] when no column has the title.
    pub fn change_status(&mut self, id: &TaskId, status: &str) -> BoardResult<bool> {
        let title = self.require_column(status)?;
        self.edit_task(id, TaskPatch::status_only(title))
    }

    /// Moves the task to the archive and dispatches the archive call.
    ///
    /// Returns `false` when no active task has the identifier.
    pub fn archive_task(&mut self, id: &TaskId) -> bool {
        if self
            .tasks
            .archive(id, &mut self.archive, &*self.clock)
            .is_none()
        {
            debug!(task_id = %id, "archive addressed a task that is gone");
            return false;
        }
        self.sync.dispatch(SyncOp::Archive { id: id.clone() });
        true
    }

    /// Removes an active task and dispatches the delete call.
    ///
    /// Returns `false` when no active task has the identifier.
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        if self.tasks.remove(id).is_none() {
            debug!(task_id = %id, "delete addressed a task that is gone");
            return false;
        }
        self.sync.dispatch(SyncOp::Delete { id: id.clone() });
        true
    }

    /// Moves an archived task back to the board and dispatches the restore
    /// call. A task whose column no longer exists lands in "To Do" and the
    /// new status is sent along.
    ///
    /// Returns `Ok(false)` when no archived task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when an active task already has the
    /// identifier.
    pub fn restore_task(&mut self, id: &TaskId) -> BoardResult<bool> {
        let Some(restored) = self
            .archive
            .restore(id, &self.columns, &mut self.tasks, &*self.clock)?
        else {
            debug!(task_id = %id, "restore addressed a task that is gone");
            return Ok(false);
        };
        let reassigned = restored
            .reassigned_from
            .and_then(|_| self.tasks.get(id).map(TaskFields::from));
        self.sync.dispatch(SyncOp::Restore {
            id: id.clone(),
            reassigned,
        });
        Ok(true)
    }

    /// Deletes an archived task for good.
    ///
    /// Returns `false` when no archived task has the identifier.
    pub fn permanently_delete_task(&mut self, id: &TaskId) -> bool {
        if self.archive.permanently_delete(id).is_none() {
            debug!(task_id = %id, "permanent delete addressed a task that is gone");
            return false;
        }
        self.sync.dispatch(SyncOp::PermanentDelete { id: id.clone() });
        true
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Column`] for a blank or duplicate title.
    pub fn add_column(&mut self, title: &str) -> BoardResult<Column> {
        Ok(self.columns.add_column(title)?)
    }

    /// Removes a column, moving its tasks to "To Do" and sending each
    /// moved task's new status to the remote service.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Column`] for a default or unknown column.
    pub fn remove_column(&mut self, title: &str) -> BoardResult<ColumnRemoval> {
        let removal = self
            .columns
            .remove_column(title, &mut self.tasks, &*self.clock)?;
        for id in &removal.reassigned {
            if let Some(fields) = self.tasks.get(id).map(TaskFields::from) {
                self.sync.dispatch(SyncOp::Update {
                    id: id.clone(),
                    fields,
                });
            }
        }
        Ok(removal)
    }

    /// Sets the search term.
    pub fn search(&mut self, term: impl Into<String>) {
        self.query.set_term(term);
    }

    /// Sets the active filters.
    pub fn set_filters(&mut self, filters: Vec<TaskFilter>) {
        self.query.set_filters(filters);
    }

    /// Clears the term and filters, returning to the raw board.
    pub fn clear_search(&mut self) {
        self.query.clear();
    }

    /// Applies a completion event to the local state.
    pub fn apply(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Created {
                provisional,
                record,
            } => self.confirm_created(&provisional, record),
            SyncEvent::Completed { op } => {
                debug!(task_id = %op.task_id(), operation = op.label(), "remote call succeeded");
            }
            SyncEvent::Failed { op, error } => {
                warn!(
                    task_id = %op.task_id(),
                    operation = op.label(),
                    error = %error,
                    "remote call failed"
                );
                if let SyncOp::Create { provisional, .. } = &op {
                    self.sync.on_create_failed(provisional);
                }
                self.notify(op, &error);
            }
        }
    }

    /// Applies every completion event that is already available.
    ///
    /// Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0_usize;
        while let Some(event) = self.sync.try_next_event() {
            self.apply(event);
            applied = applied.saturating_add(1);
        }
        applied
    }

    /// Waits for the next completion event, applies it and returns it.
    ///
    /// Returns `None` at once when no remote call is in flight.
    pub async fn next_sync_event(&mut self) -> Option<SyncEvent> {
        let event = self.sync.next_event().await?;
        self.apply(event.clone());
        Some(event)
    }

    /// Waits until every dispatched remote call, including calls released
    /// by completing creates, has been applied.
    pub async fn settle(&mut self) {
        while self.next_sync_event().await.is_some() {}
    }

    /// Reloads active and archived tasks from the remote service, replacing
    /// local state.
    ///
    /// Outstanding remote calls are applied first, so the fetched lists
    /// already reflect every local change the service accepted. Tasks the
    /// service does not know yet, active or archived, are kept. Statuses
    /// with no column gain one, so every task stays on the board. Returns
    /// `None` when the service could not be read; a notification is raised
    /// and the stores are left as they were.
    pub async fn refresh(&mut self) -> Option<RefreshSummary> {
        self.settle().await;
        let remote = Arc::clone(self.sync.remote());
        let fetched = fetch_all(remote.as_ref()).await;
        let (active, archived) = match fetched {
            Ok(lists) => lists,
            Err(error) => {
                warn!(error = %error, "refresh failed");
                self.raise(NewNotification::new(
                    kind_of(&error),
                    message_for(REFRESH, &error),
                    REFRESH,
                ));
                return None;
            }
        };

        let mut summary = RefreshSummary::default();
        let clock = &*self.clock;
        let unconfirmed: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| self.sync.is_unconfirmed(task.id()))
            .cloned()
            .collect();
        let unconfirmed_archived: Vec<ArchiveRecord> = self
            .archive
            .iter()
            .filter(|record| self.sync.is_unconfirmed(record.id()))
            .cloned()
            .collect();

        let mut fresh = Vec::with_capacity(active.len());
        for record in active {
            match ingest(record, clock) {
                Ok(task) => fresh.push(task),
                Err(error) => {
                    warn!(error = %error, "skipping unreadable task record");
                    summary.skipped = summary.skipped.saturating_add(1);
                }
            }
        }
        let mut stored = Vec::with_capacity(archived.len());
        for record in archived {
            match ingest(record, clock) {
                Ok(task) => stored.push(ArchiveRecord::from_fetched(task)),
                Err(error) => {
                    warn!(error = %error, "skipping unreadable archived record");
                    summary.skipped = summary.skipped.saturating_add(1);
                }
            }
        }

        for task in &fresh {
            if self.columns.contains(task.status().as_str()) {
                continue;
            }
            if let Ok(column) = self.columns.add_column(task.status().as_str()) {
                info!(column = %column.title(), "adding column for fetched status");
                summary.added_columns.push(column.title().clone());
            }
        }

        self.tasks.replace_all(fresh.into_iter().chain(unconfirmed));
        self.archive
            .replace_all(stored.into_iter().chain(unconfirmed_archived));
        summary.active = self.tasks.len();
        summary.archived = self.archive.len();
        info!(
            active = summary.active,
            archived = summary.archived,
            skipped = summary.skipped,
            "board refreshed"
        );
        Some(summary)
    }

    /// Dismisses a notification. Returns `false` when it is not queued.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.failed_ops.remove(&id);
        self.notifications.dismiss(id).is_some()
    }

    /// Re-dispatches the operation behind a retryable notification and
    /// dismisses it.
    ///
    /// Creates and updates are resent with the task's current fields. A
    /// task archived after its create failed is created, then archived.
    /// Returns `false` when the notification is gone, not retryable, or
    /// its task no longer exists locally.
    pub fn retry(&mut self, id: NotificationId) -> bool {
        let retryable = self
            .notifications
            .get(id)
            .is_some_and(|notification| notification.is_retryable());
        if !retryable {
            return false;
        }
        let Some(op) = self.failed_ops.remove(&id) else {
            return false;
        };
        self.notifications.dismiss(id);

        let current = |task_id: &TaskId| self.tasks.get(task_id).map(TaskFields::from);
        let resend = match op {
            SyncOp::Create { provisional, .. } => self.recreate(provisional),
            SyncOp::Update { id: task_id, .. } => {
                current(&task_id).map_or_else(Vec::new, |fields| {
                    vec![SyncOp::Update {
                        id: task_id,
                        fields,
                    }]
                })
            }
            other => vec![other],
        };
        if resend.is_empty() {
            debug!(notification = %id, "retry addressed a task that is gone");
            return false;
        }
        for again in resend {
            info!(task_id = %again.task_id(), operation = again.label(), "retrying remote call");
            self.sync.dispatch(again);
        }
        true
    }

    fn recreate(&self, provisional: TaskId) -> Vec<SyncOp> {
        if let Some(task) = self.tasks.get(&provisional) {
            return vec![SyncOp::Create {
                fields: TaskFields::from(task),
                provisional,
            }];
        }
        self.archive.get(&provisional).map_or_else(Vec::new, |record| {
            vec![
                SyncOp::Create {
                    fields: TaskFields::from(record.snapshot()),
                    provisional: provisional.clone(),
                },
                SyncOp::Archive { id: provisional },
            ]
        })
    }

    /// Clears all local state for manual recovery, keeping the configured
    /// columns. Outstanding remote calls still complete but find nothing
    /// to update.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.archive.clear();
        self.query.clear();
        self.notifications.clear();
        self.failed_ops.clear();
        self.sync.clear_deferred();
        self.columns = ColumnRegistry::new();
        self.seed_custom_columns();
        info!("board reset");
    }

    fn require_column(&self, title: &str) -> Result<ColumnTitle, ValidationError> {
        self.columns
            .get(title)
            .map(|column| column.title().clone())
            .ok_or_else(|| ValidationError::UnknownColumn(title.to_owned()))
    }

    fn seed_custom_columns(&mut self) {
        for title in &self.custom_columns {
            if let Err(error) = self.columns.add_column(title) {
                warn!(column = %title, error = %error, "skipping configured column");
            }
        }
    }

    fn confirm_created(&mut self, provisional: &TaskId, record: RawTaskRecord) {
        let confirmed = match ingest(record, &*self.clock) {
            Ok(task) => task.id().clone(),
            Err(error) => {
                warn!(
                    task_id = %provisional,
                    error = %error,
                    "create returned an unreadable record"
                );
                self.sync.on_create_failed(provisional);
                self.raise(
                    NewNotification::new(
                        NotificationKind::Remote,
                        format!("Failed to create task: {error}"),
                        "create task",
                    )
                    .with_task(provisional.clone()),
                );
                return;
            }
        };
        debug!(task_id = %confirmed, provisional = %provisional, "create confirmed");
        if self.tasks.confirm_id(provisional, confirmed.clone()).is_none() {
            self.archive.confirm_id(provisional, &confirmed);
        }
        self.sync.on_created(provisional, &confirmed);
    }

    fn notify(&mut self, op: SyncOp, error: &RemoteError) {
        let label = op.label();
        let draft = NewNotification::new(kind_of(error), message_for(label, error), label)
            .with_task(op.task_id().clone())
            .with_retryable(error.is_retryable());
        let id = self.raise(draft);
        if error.is_retryable() {
            self.failed_ops.insert(id, op);
        }
    }

    fn raise(&mut self, draft: NewNotification) -> NotificationId {
        let id = self.notifications.push(draft, self.clock.utc());
        let notifications = &self.notifications;
        self.failed_ops
            .retain(|queued, _| notifications.contains(*queued));
        id
    }
}

async fn fetch_all<R>(remote: &R) -> RemoteResult<(Vec<RawTaskRecord>, Vec<RawTaskRecord>)>
where
    R: TaskRemote + ?Sized,
{
    let active = remote.list_tasks().await?;
    let archived = remote.list_archived_tasks().await?;
    Ok((active, archived))
}

const fn kind_of(error: &RemoteError) -> NotificationKind {
    match error {
        RemoteError::Network(_) => NotificationKind::Network,
        RemoteError::Unauthorized | RemoteError::Forbidden => NotificationKind::Authorization,
        RemoteError::NotFound(_)
        | RemoteError::Rejected { .. }
        | RemoteError::Malformed(_)
        | RemoteError::Backend(_) => NotificationKind::Remote,
    }
}

fn message_for(operation: &str, error: &RemoteError) -> String {
    match error {
        RemoteError::Network(_) => "Network error: Please check your connection".to_owned(),
        RemoteError::Unauthorized => "Unauthorized: Please log in again".to_owned(),
        RemoteError::Forbidden => {
            format!("Forbidden: You do not have permission to {operation}")
        }
        other => format!("Failed to {operation}: {other}"),
    }
}

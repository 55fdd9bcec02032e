//! In-memory remote task collaborator for tests and local demos.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{CANONICAL_ID_FIELD, LEGACY_ID_FIELD, RawTaskRecord, TaskFields, TaskId},
    ports::{RemoteError, RemoteResult, TaskRemote},
};

/// Field name under which the collaborator reports identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdField {
    /// Report identifiers as `id`.
    #[default]
    Canonical,
    /// Report identifiers as `taskId`, as the original service does.
    Legacy,
}

impl IdField {
    const fn name(self) -> &'static str {
        match self {
            Self::Canonical => CANONICAL_ID_FIELD,
            Self::Legacy => LEGACY_ID_FIELD,
        }
    }
}

/// A call received by the in-memory collaborator, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// `list_tasks`.
    ListTasks,
    /// `create_task` with the submitted title.
    CreateTask(String),
    /// `update_task`.
    UpdateTask(TaskId),
    /// `delete_task`.
    DeleteTask(TaskId),
    /// `archive_task`.
    ArchiveTask(TaskId),
    /// `list_archived_tasks`.
    ListArchivedTasks,
    /// `restore_task`.
    RestoreTask(TaskId),
    /// `permanently_delete_task`.
    PermanentlyDeleteTask(TaskId),
}

/// Thread-safe in-memory task collaborator.
///
/// Identifiers are assigned from a counter and reported as JSON numbers,
/// exercising the identity normalizer the same way the real service does.
/// Failures can be scripted with [`fail_next`](Self::fail_next) and
/// [`set_offline`](Self::set_offline).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRemote {
    state: Arc<RwLock<RemoteState>>,
}

#[derive(Debug, Default)]
struct RemoteState {
    id_field: IdField,
    next_id: u64,
    active: Vec<StoredTask>,
    archived: Vec<StoredTask>,
    failures: VecDeque<RemoteError>,
    offline: bool,
    calls: Vec<RemoteCall>,
}

#[derive(Debug, Clone)]
struct StoredTask {
    id: u64,
    fields: Map<String, Value>,
}

impl StoredTask {
    fn matches(&self, id: &TaskId) -> bool {
        id.as_str().parse::<u64>().is_ok_and(|value| value == self.id)
    }

    fn to_record(&self, id_field: IdField) -> RawTaskRecord {
        let mut fields = self.fields.clone();
        fields.insert(id_field.name().to_owned(), Value::from(self.id));
        RawTaskRecord::new(fields)
    }
}

fn lock_error(err: &impl std::fmt::Display) -> RemoteError {
    RemoteError::backend(std::io::Error::other(err.to_string()))
}

fn field_map(fields: &TaskFields) -> RemoteResult<Map<String, Value>> {
    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map),
        other => Err(RemoteError::Rejected {
            status: 400,
            message: format!("expected an object, got {other}"),
        }),
    }
}

fn take(tasks: &mut Vec<StoredTask>, id: &TaskId) -> RemoteResult<StoredTask> {
    let position = tasks
        .iter()
        .position(|task| task.matches(id))
        .ok_or_else(|| RemoteError::NotFound(id.clone()))?;
    Ok(tasks.remove(position))
}

impl InMemoryTaskRemote {
    /// Creates an empty collaborator reporting identifiers as `id`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collaborator reporting identifiers under `id_field`.
    #[must_use]
    pub fn with_id_field(id_field: IdField) -> Self {
        let state = RemoteState {
            id_field,
            ..RemoteState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Stores an active task directly, bypassing the call log, and returns
    /// its identifier.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails or the fields do
    /// not serialize to an object.
    pub fn seed(&self, fields: &TaskFields) -> RemoteResult<TaskId> {
        let map = field_map(fields)?;
        let mut state = self.write()?;
        Ok(state.insert_active(map))
    }

    /// Stores an archived task directly and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails or the fields do
    /// not serialize to an object.
    pub fn seed_archived(&self, fields: &TaskFields) -> RemoteResult<TaskId> {
        let mut map = field_map(fields)?;
        map.insert("archivedDate".to_owned(), Value::from(Utc::now().to_rfc3339()));
        map.insert("isArchived".to_owned(), Value::Bool(true));
        let mut state = self.write()?;
        let id = state.allocate_id();
        state.archived.push(StoredTask { id, fields: map });
        Ok(TaskId::from(id))
    }

    /// Makes the next call fail with `error`. Queued failures are consumed
    /// in order.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails.
    pub fn fail_next(&self, error: RemoteError) -> RemoteResult<()> {
        self.write()?.failures.push_back(error);
        Ok(())
    }

    /// Makes every call fail with a network error until switched back.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails.
    pub fn set_offline(&self, offline: bool) -> RemoteResult<()> {
        self.write()?.offline = offline;
        Ok(())
    }

    /// Returns the calls received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails.
    pub fn calls(&self) -> RemoteResult<Vec<RemoteCall>> {
        Ok(self.read()?.calls.clone())
    }

    /// Returns the stored active records.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails.
    pub fn active_records(&self) -> RemoteResult<Vec<RawTaskRecord>> {
        let state = self.read()?;
        Ok(state.records(&state.active))
    }

    /// Returns the stored archived records.
    ///
    /// # Errors
    ///
    /// Returns backend errors when lock acquisition fails.
    pub fn archived_records(&self) -> RemoteResult<Vec<RawTaskRecord>> {
        let state = self.read()?;
        Ok(state.records(&state.archived))
    }

    fn read(&self) -> RemoteResult<RwLockReadGuard<'_, RemoteState>> {
        self.state.read().map_err(|err| lock_error(&err))
    }

    fn write(&self) -> RemoteResult<RwLockWriteGuard<'_, RemoteState>> {
        self.state.write().map_err(|err| lock_error(&err))
    }

    /// Records the call and applies any scripted failure.
    fn begin(&self, call: RemoteCall) -> RemoteResult<RwLockWriteGuard<'_, RemoteState>> {
        let mut state = self.write()?;
        state.calls.push(call);
        if state.offline {
            return Err(RemoteError::Network("collaborator offline".to_owned()));
        }
        if let Some(error) = state.failures.pop_front() {
            return Err(error);
        }
        Ok(state)
    }
}

impl RemoteState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id = self.next_id.saturating_add(1);
        self.next_id
    }

    fn insert_active(&mut self, mut fields: Map<String, Value>) -> TaskId {
        let id = self.allocate_id();
        fields.insert("isArchived".to_owned(), Value::Bool(false));
        self.active.push(StoredTask { id, fields });
        TaskId::from(id)
    }

    fn records(&self, tasks: &[StoredTask]) -> Vec<RawTaskRecord> {
        tasks
            .iter()
            .map(|task| task.to_record(self.id_field))
            .collect()
    }
}

#[async_trait]
impl TaskRemote for InMemoryTaskRemote {
    async fn list_tasks(&self) -> RemoteResult<Vec<RawTaskRecord>> {
        let state = self.begin(RemoteCall::ListTasks)?;
        Ok(state.records(&state.active))
    }

    async fn create_task(&self, fields: &TaskFields) -> RemoteResult<RawTaskRecord> {
        let map = field_map(fields)?;
        let mut state = self.begin(RemoteCall::CreateTask(fields.title.clone()))?;
        let id = state.insert_active(map);
        let id_field = state.id_field;
        state
            .active
            .iter()
            .find(|task| task.matches(&id))
            .map(|task| task.to_record(id_field))
            .ok_or(RemoteError::NotFound(id))
    }

    async fn update_task(&self, id: &TaskId, fields: &TaskFields) -> RemoteResult<()> {
        let map = field_map(fields)?;
        let mut state = self.begin(RemoteCall::UpdateTask(id.clone()))?;
        let task = state
            .active
            .iter_mut()
            .find(|task| task.matches(id))
            .ok_or_else(|| RemoteError::NotFound(id.clone()))?;
        task.fields.extend(map);
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> RemoteResult<()> {
        let mut state = self.begin(RemoteCall::DeleteTask(id.clone()))?;
        take(&mut state.active, id).map(drop)
    }

    async fn archive_task(&self, id: &TaskId) -> RemoteResult<()> {
        let mut state = self.begin(RemoteCall::ArchiveTask(id.clone()))?;
        let mut task = take(&mut state.active, id)?;
        task.fields.insert(
            "archivedDate".to_owned(),
            Value::from(Utc::now().to_rfc3339()),
        );
        task.fields.insert("isArchived".to_owned(), Value::Bool(true));
        state.archived.push(task);
        Ok(())
    }

    async fn list_archived_tasks(&self) -> RemoteResult<Vec<RawTaskRecord>> {
        let state = self.begin(RemoteCall::ListArchivedTasks)?;
        Ok(state.records(&state.archived))
    }

    async fn restore_task(&self, id: &TaskId) -> RemoteResult<()> {
        let mut state = self.begin(RemoteCall::RestoreTask(id.clone()))?;
        let mut task = take(&mut state.archived, id)?;
        task.fields.remove("archivedDate");
        task.fields.insert("isArchived".to_owned(), Value::Bool(false));
        state.active.push(task);
        Ok(())
    }

    async fn permanently_delete_task(&self, id: &TaskId) -> RemoteResult<()> {
        let mut state = self.begin(RemoteCall::PermanentlyDeleteTask(id.clone()))?;
        take(&mut state.archived, id).map(drop)
    }
}

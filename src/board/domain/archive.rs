//! Archived task snapshots, held apart from the active tasks.

use super::{ColumnRegistry, ColumnTitle, Task, TaskId, TaskStore, TaskStoreError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: u64 = 86_400;

/// Snapshot of an archived task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    snapshot: Task,
    archived_at: DateTime<Utc>,
}

impl ArchiveRecord {
    /// Archives `task` at the current clock time.
    #[must_use]
    pub fn archive(mut task: Task, clock: &impl Clock) -> Self {
        let archived_at = task.mark_archived(clock);
        Self {
            snapshot: task,
            archived_at,
        }
    }

    /// Wraps a task fetched from the remote archive list.
    ///
    /// A record with no archive time counts as archived at midnight UTC on
    /// its creation date.
    #[must_use]
    pub fn from_fetched(mut task: Task) -> Self {
        let archived_at = task
            .archived_at()
            .unwrap_or_else(|| task.created_date().and_time(NaiveTime::MIN).and_utc());
        task.restamp_archived(archived_at);
        Self {
            snapshot: task,
            archived_at,
        }
    }

    /// Returns the archived task's identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        self.snapshot.id()
    }

    /// Returns the archived snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Task {
        &self.snapshot
    }

    /// Returns when the task was archived.
    #[must_use]
    pub const fn archived_at(&self) -> DateTime<Utc> {
        self.archived_at
    }

    /// Whole days since archiving, rounded up; zero for the same instant.
    #[must_use]
    pub fn days_archived(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = (now - self.archived_at).num_seconds().unsigned_abs();
        elapsed.div_ceil(SECONDS_PER_DAY)
    }

    /// Returns `true` when the snapshot's due date lies before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.snapshot.is_overdue(today)
    }

    fn into_active(self, clock: &impl Clock) -> Task {
        let mut task = self.snapshot;
        task.clear_archived(clock);
        task
    }
}

/// Result of restoring an archived task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    /// Identifier of the restored task.
    pub id: TaskId,
    /// Status the task held before archiving, when it had to be replaced
    /// because its column no longer exists.
    pub reassigned_from: Option<ColumnTitle>,
}

/// Collection of archived task snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveStore {
    records: Vec<ArchiveRecord>,
}

impl ArchiveStore {
    /// Creates an empty archive.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Inserts a record, replacing any record with the same identifier.
    pub fn insert(&mut self, record: ArchiveRecord) {
        self.records.retain(|existing| existing.id() != record.id());
        self.records.push(record);
    }

    /// Replaces every record.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = ArchiveRecord>) {
        self.records.clear();
        for record in records {
            self.insert(record);
        }
    }

    /// Moves the matching snapshot back into `tasks`.
    ///
    /// The archive time is cleared and the modification time refreshed. If
    /// the snapshot's status no longer names a column in `columns`, the task
    /// is reassigned to "To Do". Returns `Ok(None)` when no such record
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when `tasks` already holds
    /// a task with the same identifier; the archive is left unchanged.
    pub fn restore(
        &mut self,
        id: &TaskId,
        columns: &ColumnRegistry,
        tasks: &mut TaskStore,
        clock: &impl Clock,
    ) -> Result<Option<Restored>, TaskStoreError> {
        if tasks.contains(id) {
            return Err(TaskStoreError::DuplicateTask(id.clone()));
        }
        let Some(record) = self.take(id) else {
            return Ok(None);
        };

        let mut task = record.into_active(clock);
        let reassigned_from = if columns.contains(task.status().as_str()) {
            None
        } else {
            let previous = task.status().clone();
            task.reassign(ColumnTitle::to_do(), clock);
            Some(previous)
        };

        tasks.add(task)?;
        Ok(Some(Restored {
            id: id.clone(),
            reassigned_from,
        }))
    }

    /// Replaces a provisional identifier with the one the remote service
    /// assigned. Returns `false` when no record carries `provisional`.
    pub fn confirm_id(&mut self, provisional: &TaskId, confirmed: &TaskId) -> bool {
        let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.id() == provisional)
        else {
            return false;
        };
        record.snapshot.rekey(confirmed.clone());
        true
    }

    /// Removes the matching record for good.
    pub fn permanently_delete(&mut self, id: &TaskId) -> Option<ArchiveRecord> {
        self.take(id)
    }

    /// Returns the matching record.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&ArchiveRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Returns `true` when a record with the identifier is present.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over the records in archive order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveRecord> {
        self.records.iter()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the archive is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn take(&mut self, id: &TaskId) -> Option<ArchiveRecord> {
        let position = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(position))
    }
}

impl<'a> IntoIterator for &'a ArchiveStore {
    type Item = &'a ArchiveRecord;
    type IntoIter = std::slice::Iter<'a, ArchiveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

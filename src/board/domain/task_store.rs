//! In-memory collection of active tasks.

use super::{ArchiveRecord, ArchiveStore, ColumnTitle, Task, TaskId, TaskPatch, TaskStoreError};
use mockable::Clock;

/// Ordered collection of active tasks keyed by canonical identifier.
///
/// Insertion order is preserved. Operations addressing an identifier that
/// is not present are no-ops and report `None`; a stale reference is never
/// a fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Creates a store from existing tasks.
    ///
    /// A later task with an identifier already seen replaces the earlier
    /// one in place, so identifiers stay unique.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut store = Self::new();
        store.replace_all(tasks);
        store
    }

    /// Replaces the whole collection, deduplicating by identifier.
    pub fn replace_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks.clear();
        for task in tasks {
            match self.find_mut(task.id()) {
                Some(existing) => *existing = task,
                None => self.tasks.push(task),
            }
        }
    }

    /// Inserts a task at the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when a task with the same
    /// identifier is already present.
    pub fn add(&mut self, task: Task) -> Result<(), TaskStoreError> {
        if self.contains(task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id().clone()));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Merges `patch` into the matching task and refreshes its
    /// modification time.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch, clock: &impl Clock) -> Option<&Task> {
        let task = self.find_mut(id)?;
        task.apply(patch, clock);
        Some(&*task)
    }

    /// Changes only the status of the matching task.
    pub fn change_status(
        &mut self,
        id: &TaskId,
        status: ColumnTitle,
        clock: &impl Clock,
    ) -> Option<&Task> {
        self.update(id, TaskPatch::status_only(status), clock)
    }

    /// Removes and returns the matching task.
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == id)?;
        Some(self.tasks.remove(position))
    }

    /// Moves the matching task into `archive`, stamping its archive time.
    pub fn archive<'a>(
        &mut self,
        id: &TaskId,
        archive: &'a mut ArchiveStore,
        clock: &impl Clock,
    ) -> Option<&'a ArchiveRecord> {
        let task = self.remove(id)?;
        archive.insert(ArchiveRecord::archive(task, clock));
        archive.get(id)
    }

    /// Replaces a provisional identifier with the one the remote service
    /// assigned.
    ///
    /// When a task with the confirmed identifier is already present (a
    /// reconciling fetch got there first) the provisional entry is dropped
    /// instead, so the task never appears twice.
    pub fn confirm_id(&mut self, provisional: &TaskId, confirmed: TaskId) -> Option<&Task> {
        if provisional == &confirmed {
            return self.get(provisional);
        }
        if self.contains(&confirmed) {
            self.tasks.retain(|task| task.id() != provisional);
            return self.get(&confirmed);
        }
        let task = self.find_mut(provisional)?;
        task.rekey(confirmed);
        Some(&*task)
    }

    /// Moves every task with status `from` to status `to`.
    ///
    /// Returns the identifiers of the reassigned tasks.
    pub fn reassign_status(
        &mut self,
        from: &ColumnTitle,
        to: &ColumnTitle,
        clock: &impl Clock,
    ) -> Vec<TaskId> {
        self.tasks
            .iter_mut()
            .filter(|task| task.status() == from)
            .map(|task| {
                task.reassign(to.clone(), clock);
                task.id().clone()
            })
            .collect()
    }

    /// Returns the matching task.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns `true` when a task with the identifier is present.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the tasks whose status equals `status`, in store order.
    #[must_use]
    pub fn with_status(&self, status: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.status() == status)
            .collect()
    }

    /// Iterates over the tasks in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Returns the tasks as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

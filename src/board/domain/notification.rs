//! Transient user-visible notifications raised by failed remote calls.

use super::TaskId;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt;

/// Identifier of a notification, unique for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Returns the raw numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for NotificationId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of failure a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// The remote collaborator could not be reached.
    Network,
    /// The remote collaborator rejected the caller's credentials.
    Authorization,
    /// Any other remote failure.
    Remote,
}

/// Content of a notification before it is assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    kind: NotificationKind,
    message: String,
    operation: &'static str,
    task_id: Option<TaskId>,
    retryable: bool,
}

impl NewNotification {
    /// Creates a non-retryable notification for `operation`.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>, operation: &'static str) -> Self {
        Self {
            kind,
            message: message.into(),
            operation,
            task_id: None,
            retryable: false,
        }
    }

    /// Names the task the failed operation addressed.
    #[must_use]
    pub fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Marks whether the failed operation may be retried.
    #[must_use]
    pub const fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

/// A notification shown to the user until dismissed or evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    message: String,
    operation: &'static str,
    task_id: Option<TaskId>,
    retryable: bool,
    raised_at: DateTime<Utc>,
}

impl Notification {
    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the name of the failed operation.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the task the failed operation addressed, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    /// Returns `true` when a retry is offered.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Returns when the notification was raised.
    #[must_use]
    pub const fn raised_at(&self) -> DateTime<Utc> {
        self.raised_at
    }
}

/// Bounded queue of notifications; the oldest is evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notifications {
    entries: VecDeque<Notification>,
    capacity: usize,
    next_id: u64,
}

impl Notifications {
    /// Default number of notifications retained.
    pub const DEFAULT_CAPACITY: usize = 20;

    /// Creates an empty queue holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Appends a notification, evicting the oldest when full.
    pub fn push(&mut self, draft: NewNotification, raised_at: DateTime<Utc>) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        let NewNotification {
            kind,
            message,
            operation,
            task_id,
            retryable,
        } = draft;
        self.entries.push_back(Notification {
            id,
            kind,
            message,
            operation,
            task_id,
            retryable,
            raised_at,
        });
        id
    }

    /// Removes and returns the notification.
    pub fn dismiss(&mut self, id: NotificationId) -> Option<Notification> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        self.entries.remove(position)
    }

    /// Returns the notification.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns `true` when the notification is still queued.
    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Notification> {
        self.entries.iter()
    }

    /// Returns the number of queued notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of notifications retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every notification.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a Notifications {
    type Item = &'a Notification;
    type IntoIter = std::collections::vec_deque::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

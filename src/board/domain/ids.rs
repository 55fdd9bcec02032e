//! Identifier and validated scalar types for the board domain.

use super::{BoardDomainError, DefaultColumn};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking identifiers minted locally before the remote service
/// has assigned one.
const PROVISIONAL_PREFIX: &str = "tmp-";

/// Canonical task identifier.
///
/// The remote service exposes identifiers under different field names and
/// types; once a record has passed through
/// [`normalize`](super::normalize) only this type is seen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTaskId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns `true` when the identifier was minted locally and has not
    /// yet been replaced by the remote service's identifier.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for TaskId {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of time-based provisional identifiers.
///
/// Identifiers are strictly increasing even when the clock stalls or steps
/// backwards, so two tasks created within the same millisecond never
/// collide.
#[derive(Debug, Clone, Default)]
pub struct ProvisionalIds {
    last: i64,
}

impl ProvisionalIds {
    /// Creates a new identifier source.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Mints the next provisional identifier.
    pub fn next(&mut self, clock: &impl Clock) -> TaskId {
        let now = clock.utc().timestamp_millis();
        let stamp = now.max(self.last.saturating_add(1));
        self.last = stamp;
        TaskId(format!("{PROVISIONAL_PREFIX}{stamp}"))
    }
}

/// Validated column title; also the literal value of a task's status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnTitle(String);

impl ColumnTitle {
    /// Creates a validated column title.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnTitle`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyColumnTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title of the "To Do" column, the fallback status.
    #[must_use]
    pub fn to_do() -> Self {
        Self::from_default(DefaultColumn::ToDo)
    }

    pub(crate) fn from_default(column: DefaultColumn) -> Self {
        Self(column.title().to_owned())
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ColumnTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ColumnTitle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ColumnTitle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for ColumnTitle {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnTitle> for String {
    fn from(title: ColumnTitle) -> Self {
        title.0
    }
}

impl fmt::Display for ColumnTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

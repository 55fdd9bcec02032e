//! Search and filter overlay over the active tasks.
//!
//! The overlay is a pure derivation: it borrows the tasks it is given and
//! never mutates them.

use super::Task;

/// A facet restricting the search result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    /// Keep tasks whose status equals the column title.
    Status(String),
    /// Keep tasks whose category equals the name.
    Category(String),
}

impl TaskFilter {
    /// Returns `true` when `task` satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Status(title) => task.status() == title.as_str(),
            Self::Category(name) => task.category() == Some(name.as_str()),
        }
    }
}

/// Current search term and active filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    filters: Vec<TaskFilter>,
}

impl SearchQuery {
    /// Creates an inactive query.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            term: String::new(),
            filters: Vec::new(),
        }
    }

    /// Sets the search term.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Sets the active filters.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<TaskFilter>) -> Self {
        self.filters = filters;
        self
    }

    /// Returns the raw search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns the active filters.
    #[must_use]
    pub fn filters(&self) -> &[TaskFilter] {
        &self.filters
    }

    /// Replaces the search term.
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Replaces the active filters.
    pub fn set_filters(&mut self, filters: Vec<TaskFilter>) {
        self.filters = filters;
    }

    /// Returns `true` when the term is non-blank, so a filtered view is
    /// shown instead of the raw columns.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// Runs the query over `tasks`.
    #[must_use]
    pub fn apply<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
        filter(tasks, &self.term, &self.filters)
    }

    /// Resets the term and filters.
    pub fn clear(&mut self) {
        self.term.clear();
        self.filters.clear();
    }
}

/// Returns the tasks matching `term` and at least one of `filters`.
///
/// A task matches the term when the trimmed term is a case-insensitive
/// substring of its title, description or status. With no filters the
/// term alone decides. A blank term yields an empty result.
#[must_use]
pub fn filter<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    term: &str,
    filters: &[TaskFilter],
) -> Vec<&'a Task> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    tasks
        .into_iter()
        .filter(|task| matches_term(task, &needle))
        .filter(|task| filters.is_empty() || filters.iter().any(|f| f.matches(task)))
        .collect()
}

fn matches_term(task: &Task, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(task.title())
        || task.description().is_some_and(contains)
        || contains(task.status().as_str())
}

/// Distinct statuses in first-seen order.
#[must_use]
pub fn available_statuses<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a str> {
    distinct(tasks.into_iter().map(|task| task.status().as_str()))
}

/// Distinct categories in first-seen order; tasks without one are skipped.
#[must_use]
pub fn available_categories<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a str> {
    distinct(tasks.into_iter().filter_map(Task::category))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

//! New-task form input and its validation.

use super::{ColumnTitle, ValidationError};
use chrono::NaiveDate;

/// Unvalidated input from the new-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    status: Option<String>,
    category: Option<String>,
}

/// New-task input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNewTask {
    /// Trimmed, non-blank title.
    pub title: String,
    /// Description, blank values dropped.
    pub description: Option<String>,
    /// Due date.
    pub due_date: NaiveDate,
    /// Requested status, if the form named one.
    pub status: Option<ColumnTitle>,
    /// Category, blank values dropped.
    pub category: Option<String>,
}

impl NewTask {
    /// Creates form input with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Checks required fields.
    ///
    /// Column existence is checked by the coordinator, which owns the
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingTitle`] when the title is blank,
    /// [`ValidationError::MissingDueDate`] when no due date was given, or
    /// [`ValidationError::UnknownColumn`] when the status is blank.
    pub fn validate(self) -> Result<ValidatedNewTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let due_date = self.due_date.ok_or(ValidationError::MissingDueDate)?;
        let status = self
            .status
            .map(|status| {
                ColumnTitle::new(status.clone()).map_err(|_| ValidationError::UnknownColumn(status))
            })
            .transpose()?;

        Ok(ValidatedNewTask {
            title: title.to_owned(),
            description: non_blank(self.description),
            due_date,
            status,
            category: non_blank(self.category),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

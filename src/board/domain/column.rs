//! Column definitions and the ordered column registry.

use super::{ColumnError, ColumnTitle, Decoration, TaskId, TaskStore};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The three columns every board carries and that can never be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultColumn {
    /// Work not started; also the fallback status.
    ToDo,
    /// Work under way.
    InProgress,
    /// Work finished.
    Completed,
}

impl DefaultColumn {
    /// All default columns in board order.
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Completed];

    /// Returns the column title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Resolves a title to a default column, by exact match.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.title() == title)
    }
}

/// How a column is classified, resolved once when the column is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    /// One of the fixed default columns.
    Default {
        /// Which default column.
        column: DefaultColumn,
    },
    /// A user-created column.
    Custom {
        /// Assignment order of the column.
        ordinal: u32,
    },
}

impl ColumnKind {
    /// Returns the presentational decoration for this kind of column.
    #[must_use]
    pub const fn decoration(self) -> Decoration {
        match self {
            Self::Default { column } => Decoration::for_default(column),
            Self::Custom { ordinal } => Decoration::for_custom(ordinal),
        }
    }
}

/// A named bucket grouping tasks on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    title: ColumnTitle,
    ordinal: u32,
    kind: ColumnKind,
}

impl Column {
    fn new(title: ColumnTitle, ordinal: u32) -> Self {
        let kind = DefaultColumn::from_title(title.as_str()).map_or(
            ColumnKind::Custom { ordinal },
            |column| ColumnKind::Default { column },
        );
        Self {
            title,
            ordinal,
            kind,
        }
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &ColumnTitle {
        &self.title
    }

    /// Returns the assignment ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Returns the column classification.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Returns `true` for the three fixed default columns.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self.kind, ColumnKind::Default { .. })
    }

    /// Returns the presentational decoration.
    #[must_use]
    pub const fn decoration(&self) -> Decoration {
        self.kind.decoration()
    }
}

/// Outcome of removing a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRemoval {
    /// The removed column.
    pub column: Column,
    /// Tasks moved to "To Do" because they carried the removed status.
    pub reassigned: Vec<TaskId>,
}

/// Ordered set of uniquely titled columns.
///
/// The default columns are always present. New columns are appended with
/// the next ordinal; ordinals are never reused, so a column's decoration
/// stays stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
    next_ordinal: u32,
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnRegistry {
    /// Creates a registry holding only the default columns.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            columns: Vec::with_capacity(DefaultColumn::ALL.len()),
            next_ordinal: 0,
        };
        for column in DefaultColumn::ALL {
            registry.push(ColumnTitle::from_default(column));
        }
        registry
    }

    /// Appends a new column.
    ///
    /// The title is trimmed; uniqueness is an exact, case-sensitive match.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::BlankTitle`] for a blank title or
    /// [`ColumnError::DuplicateTitle`] when the title is taken.
    pub fn add_column(&mut self, title: &str) -> Result<Column, ColumnError> {
        let validated = ColumnTitle::new(title).map_err(|_| ColumnError::BlankTitle)?;
        if self.contains(validated.as_str()) {
            return Err(ColumnError::DuplicateTitle(validated.into()));
        }
        Ok(self.push(validated))
    }

    /// Removes a column, moving its tasks to "To Do". The title is trimmed
    /// the same way [`Self::add_column`] trims it.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::DefaultColumn`] for a default column or
    /// [`ColumnError::NotFound`] when no column has the title. The registry
    /// and `tasks` are unchanged on error.
    pub fn remove_column(
        &mut self,
        title: &str,
        tasks: &mut TaskStore,
        clock: &impl Clock,
    ) -> Result<ColumnRemoval, ColumnError> {
        let wanted = title.trim();
        if DefaultColumn::from_title(wanted).is_some() {
            return Err(ColumnError::DefaultColumn(wanted.to_owned()));
        }
        let position = self
            .columns
            .iter()
            .position(|column| column.title() == wanted)
            .ok_or_else(|| ColumnError::NotFound(wanted.to_owned()))?;

        let column = self.columns.remove(position);
        let reassigned = tasks.reassign_status(column.title(), &ColumnTitle::to_do(), clock);
        Ok(ColumnRemoval { column, reassigned })
    }

    /// Returns the column with the title.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.title() == title)
    }

    /// Returns `true` when a column has the title.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Iterates over the columns in board order.
    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Returns the column titles in board order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.title().as_str())
            .collect()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`: the default columns cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn push(&mut self, title: ColumnTitle) -> Column {
        let column = Column::new(title, self.next_ordinal);
        self.next_ordinal = self.next_ordinal.saturating_add(1);
        self.columns.push(column.clone());
        column
    }
}

impl<'a> IntoIterator for &'a ColumnRegistry {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

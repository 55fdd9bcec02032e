//! Shared helpers for board integration tests.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use taskboard::board::{
    adapters::memory::InMemoryTaskRemote,
    domain::{NewTask, Task, TaskId},
    services::Board,
};

/// Board wired to the in-memory task service.
pub type TestBoard = Board<InMemoryTaskRemote, DefaultClock>;

/// Provides a fresh in-memory task service for each test.
#[fixture]
pub fn remote() -> Arc<InMemoryTaskRemote> {
    Arc::new(InMemoryTaskRemote::new())
}

/// Creates a board over `remote` with the system clock.
#[must_use]
pub fn board_over(remote: &Arc<InMemoryTaskRemote>) -> TestBoard {
    Board::new(Arc::clone(remote), Arc::new(DefaultClock))
}

/// Returns a date `days` after today.
///
/// # Errors
///
/// Returns an error if the date is out of range.
pub fn days_from_today(days: u64) -> eyre::Result<NaiveDate> {
    DefaultClock
        .local()
        .date_naive()
        .checked_add_days(Days::new(days))
        .ok_or_else(|| eyre::eyre!("date out of range"))
}

/// Builds form input for a task due next week.
///
/// # Errors
///
/// Returns an error if the due date is out of range.
pub fn new_task(title: &str) -> eyre::Result<NewTask> {
    Ok(NewTask::new(title).with_due_date(days_from_today(7)?))
}

/// Finds the active task titled `title`.
///
/// # Errors
///
/// Returns an error if no active task has the title.
pub fn task_titled<'a>(board: &'a TestBoard, title: &str) -> eyre::Result<&'a Task> {
    board
        .tasks()
        .iter()
        .find(|task| task.title() == title)
        .ok_or_else(|| eyre::eyre!("no active task titled '{title}'"))
}

/// Returns the identifier of the active task titled `title`.
///
/// # Errors
///
/// Returns an error if no active task has the title.
pub fn id_of(board: &TestBoard, title: &str) -> eyre::Result<TaskId> {
    Ok(task_titled(board, title)?.id().clone())
}

/// Returns the titles shown in the column titled `column`.
#[must_use]
pub fn column_titles(board: &TestBoard, column: &str) -> Vec<String> {
    board
        .column_view(column)
        .into_iter()
        .map(|task| task.title().to_owned())
        .collect()
}

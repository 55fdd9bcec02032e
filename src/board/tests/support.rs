//! Shared fixtures and helpers for board tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;

use crate::board::domain::{ColumnTitle, Task, TaskData, TaskId};

/// Clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(instant.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .expect("clock instant should be representable")
    }
}

pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid instant")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[fixture]
pub fn clock() -> FixedClock {
    FixedClock::at(start_instant())
}

pub fn id(value: &str) -> TaskId {
    TaskId::new(value).expect("valid task id")
}

pub fn title(value: &str) -> ColumnTitle {
    ColumnTitle::new(value).expect("valid column title")
}

/// Builds a task with the given identifier, title and status.
pub fn task(clock: &FixedClock, task_id: &str, task_title: &str, status: &str) -> Task {
    Task::new(
        TaskData {
            id: id(task_id),
            title: task_title.to_owned(),
            description: None,
            status: title(status),
            due_date: Some(date(2026, 3, 20)),
            category: None,
        },
        clock,
    )
}

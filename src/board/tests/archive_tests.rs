//! Tests for archiving, restoring and purging tasks.

use chrono::Duration;
use rstest::rstest;

use super::support::{FixedClock, clock, date, id, start_instant, task, title};
use crate::board::domain::{
    ArchiveRecord, ArchiveStore, ColumnRegistry, TaskStore, TaskStoreError,
};

struct Fixture {
    clock: FixedClock,
    columns: ColumnRegistry,
    tasks: TaskStore,
    archive: ArchiveStore,
}

impl Fixture {
    fn new(clock: FixedClock) -> Self {
        let mut columns = ColumnRegistry::new();
        columns.add_column("Review").expect("column should be added");
        let tasks = TaskStore::from_tasks([
            task(&clock, "1", "Buy milk", "To Do"),
            task(&clock, "2", "Proofread", "Review"),
        ]);
        Self {
            clock,
            columns,
            tasks,
            archive: ArchiveStore::new(),
        }
    }

    fn archive_task(&mut self, task_id: &str) {
        self.tasks
            .archive(&id(task_id), &mut self.archive, &self.clock)
            .expect("task should archive");
    }
}

#[rstest]
fn archive_then_restore_returns_task_to_its_column(clock: FixedClock) {
    let mut fx = Fixture::new(clock);
    fx.archive_task("2");
    fx.clock.advance(Duration::hours(1));

    let restored = fx
        .archive
        .restore(&id("2"), &fx.columns, &mut fx.tasks, &fx.clock)
        .expect("no duplicate")
        .expect("record present");

    assert_eq!(restored.reassigned_from, None);
    assert!(fx.archive.is_empty());
    let back = fx.tasks.get(&id("2")).expect("task restored");
    assert_eq!(back.status(), "Review");
    assert_eq!(back.archived_at(), None);
    assert_eq!(back.last_modified(), start_instant() + Duration::hours(1));
}

#[rstest]
fn restore_into_removed_column_falls_back_to_to_do(clock: FixedClock) {
    let mut fx = Fixture::new(clock);
    fx.archive_task("2");
    fx.columns
        .remove_column("Review", &mut fx.tasks, &fx.clock)
        .expect("custom column should be removable");

    let restored = fx
        .archive
        .restore(&id("2"), &fx.columns, &mut fx.tasks, &fx.clock)
        .expect("no duplicate")
        .expect("record present");

    assert_eq!(restored.reassigned_from, Some(title("Review")));
    assert_eq!(
        fx.tasks.get(&id("2")).map(|t| t.status().as_str()),
        Some("To Do")
    );
}

#[rstest]
fn restore_of_unknown_record_is_a_no_op(clock: FixedClock) {
    let mut fx = Fixture::new(clock);

    let result = fx
        .archive
        .restore(&id("9"), &fx.columns, &mut fx.tasks, &fx.clock);

    assert_eq!(result, Ok(None));
    assert_eq!(fx.tasks.len(), 2);
}

#[rstest]
fn restore_refuses_to_duplicate_an_active_task(clock: FixedClock) {
    let mut fx = Fixture::new(clock);
    fx.archive_task("1");
    fx.tasks
        .add(task(&fx.clock, "1", "Buy milk", "To Do"))
        .expect("id free in active store");

    let result = fx
        .archive
        .restore(&id("1"), &fx.columns, &mut fx.tasks, &fx.clock);

    assert_eq!(result, Err(TaskStoreError::DuplicateTask(id("1"))));
    assert!(fx.archive.contains(&id("1")));
    assert_eq!(fx.tasks.with_status("To Do").len(), 1);
}

#[rstest]
fn a_task_is_never_active_and_archived_at_once(clock: FixedClock) {
    let mut fx = Fixture::new(clock);
    fx.archive_task("1");

    assert!(!fx.tasks.contains(&id("1")));
    assert!(fx.archive.contains(&id("1")));

    fx.archive
        .restore(&id("1"), &fx.columns, &mut fx.tasks, &fx.clock)
        .expect("no duplicate");

    assert!(fx.tasks.contains(&id("1")));
    assert!(!fx.archive.contains(&id("1")));
}

#[rstest]
fn permanent_delete_removes_record(clock: FixedClock) {
    let mut fx = Fixture::new(clock);
    fx.archive_task("1");

    assert!(fx.archive.permanently_delete(&id("1")).is_some());
    assert!(fx.archive.permanently_delete(&id("1")).is_none());
    assert!(fx.archive.is_empty());
    assert!(!fx.tasks.contains(&id("1")));
}

#[rstest]
fn confirm_id_rekeys_archived_snapshot(clock: FixedClock) {
    let mut archive = ArchiveStore::new();
    archive.insert(ArchiveRecord::archive(
        task(&clock, "tmp-5", "Draft", "To Do"),
        &clock,
    ));

    assert!(archive.confirm_id(&id("tmp-5"), &id("55")));
    assert!(!archive.confirm_id(&id("tmp-5"), &id("55")));
    assert!(archive.contains(&id("55")));
}

#[rstest]
#[case(Duration::zero(), 0)]
#[case(Duration::hours(1), 1)]
#[case(Duration::days(1), 1)]
#[case(Duration::days(1) + Duration::minutes(1), 2)]
#[case(Duration::days(10), 10)]
fn days_archived_rounds_up(#[case] elapsed: Duration, #[case] expected: u64, clock: FixedClock) {
    let record = ArchiveRecord::archive(task(&clock, "1", "Buy milk", "To Do"), &clock);

    assert_eq!(record.days_archived(start_instant() + elapsed), expected);
}

#[rstest]
fn archived_task_is_overdue_after_its_due_date(clock: FixedClock) {
    let record = ArchiveRecord::archive(task(&clock, "1", "Buy milk", "To Do"), &clock);

    assert!(!record.is_overdue(date(2026, 3, 20)));
    assert!(record.is_overdue(date(2026, 3, 21)));
}

#[rstest]
fn fetched_record_without_timestamp_counts_from_creation_date(clock: FixedClock) {
    let midnight = date(2026, 3, 14)
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
        .and_utc();

    let record = ArchiveRecord::from_fetched(task(&clock, "8", "Old", "To Do"));

    assert_eq!(record.archived_at(), midnight);
    assert_eq!(record.snapshot().archived_at(), Some(midnight));
    assert_eq!(record.days_archived(start_instant() + Duration::days(2)), 3);
}

#[rstest]
fn fetched_record_keeps_its_own_timestamp(clock: FixedClock) {
    let archived = ArchiveRecord::archive(task(&clock, "8", "Old", "To Do"), &clock);
    clock.advance(Duration::days(5));

    let record = ArchiveRecord::from_fetched(archived.snapshot().clone());

    assert_eq!(record.archived_at(), start_instant());
}

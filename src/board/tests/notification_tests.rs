//! Tests for the bounded notification list.

use chrono::Duration;
use rstest::rstest;

use super::support::{id, start_instant};
use crate::board::domain::{NewNotification, NotificationId, NotificationKind, Notifications};

fn draft(message: &str) -> NewNotification {
    NewNotification::new(NotificationKind::Network, message, "update task")
}

#[rstest]
fn push_assigns_increasing_ids() {
    let mut list = Notifications::default();

    let first = list.push(draft("one"), start_instant());
    let second = list.push(draft("two"), start_instant());

    assert!(second.value() > first.value());
    assert_eq!(list.len(), 2);
    assert_eq!(list.capacity(), Notifications::DEFAULT_CAPACITY);
}

#[rstest]
fn notification_keeps_its_context() {
    let mut list = Notifications::default();
    let raised = start_instant() + Duration::seconds(2);

    let nid = list.push(
        NewNotification::new(NotificationKind::Authorization, "log in", "archive task")
            .with_task(id("7"))
            .with_retryable(false),
        raised,
    );
    let stored = list.get(nid).expect("notification present");

    assert_eq!(stored.kind(), NotificationKind::Authorization);
    assert_eq!(stored.message(), "log in");
    assert_eq!(stored.operation(), "archive task");
    assert_eq!(stored.task_id(), Some(&id("7")));
    assert!(!stored.is_retryable());
    assert_eq!(stored.raised_at(), raised);
}

#[rstest]
fn oldest_entry_is_evicted_at_capacity() {
    let mut list = Notifications::with_capacity(2);

    let first = list.push(draft("one"), start_instant());
    let second = list.push(draft("two"), start_instant());
    let third = list.push(draft("three"), start_instant());

    assert_eq!(list.len(), 2);
    assert!(!list.contains(first));
    assert!(list.contains(second));
    assert!(list.contains(third));
}

#[rstest]
fn capacity_is_at_least_one() {
    let mut list = Notifications::with_capacity(0);
    list.push(draft("one"), start_instant());

    assert_eq!(list.capacity(), 1);
    assert_eq!(list.len(), 1);
}

#[rstest]
fn dismiss_removes_only_the_named_entry() {
    let mut list = Notifications::default();
    let first = list.push(draft("one"), start_instant());
    let second = list.push(draft("two"), start_instant());

    let dismissed = list.dismiss(first).expect("entry present");

    assert_eq!(dismissed.message(), "one");
    assert!(list.dismiss(first).is_none());
    assert!(list.dismiss(NotificationId::from(999)).is_none());
    let remaining: Vec<_> = list.iter().map(|n| n.id()).collect();
    assert_eq!(remaining, vec![second]);
}

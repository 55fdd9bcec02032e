//! Remote failures surface as notifications and can be retried.

use std::sync::Arc;

use rstest::rstest;
use taskboard::board::{adapters::memory::InMemoryTaskRemote, domain::NotificationKind};

use super::helpers::{board_over, column_titles, id_of, new_task, remote};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_change_is_kept_and_retried(remote: Arc<InMemoryTaskRemote>) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Write report")?)?;
    board.settle().await;
    let report = id_of(&board, "Write report")?;

    remote.set_offline(true)?;
    board.change_status(&report, "Completed")?;
    board.settle().await;

    eyre::ensure!(
        column_titles(&board, "Completed") == vec!["Write report".to_owned()],
        "local change must not be rolled back"
    );
    let failed = board
        .notifications()
        .iter()
        .next()
        .ok_or_else(|| eyre::eyre!("expected a notification"))?;
    eyre::ensure!(failed.kind() == NotificationKind::Network, "network failure expected");
    let failed_id = failed.id();

    remote.set_offline(false)?;
    eyre::ensure!(board.retry(failed_id), "network failures are retryable");
    board.settle().await;

    let mut reloaded = board_over(&remote);
    reloaded.refresh().await;
    eyre::ensure!(
        column_titles(&reloaded, "Completed") == vec!["Write report".to_owned()],
        "retried change should reach the service"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_create_stays_provisional_until_retried(
    remote: Arc<InMemoryTaskRemote>,
) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    remote.set_offline(true)?;

    let provisional = board.create_task(new_task("Buy milk")?)?;
    board.settle().await;

    eyre::ensure!(board.tasks().contains(&provisional), "task stays on the board");
    let failed_id = board
        .notifications()
        .iter()
        .next()
        .map(|notification| notification.id())
        .ok_or_else(|| eyre::eyre!("expected a notification"))?;

    remote.set_offline(false)?;
    board.retry(failed_id);
    board.settle().await;

    eyre::ensure!(!board.tasks().contains(&provisional), "provisional id replaced");
    eyre::ensure!(board.tasks().len() == 1, "no duplicate after retry");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reset_then_refresh_recovers_from_the_service(
    remote: Arc<InMemoryTaskRemote>,
) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Buy milk")?)?;
    board.settle().await;
    remote.set_offline(true)?;
    board.refresh().await;
    eyre::ensure!(board.notifications().len() == 1, "refresh failure is reported");

    board.reset();
    remote.set_offline(false)?;
    board.refresh().await;

    eyre::ensure!(board.notifications().is_empty(), "reset clears notifications");
    eyre::ensure!(
        column_titles(&board, "To Do") == vec!["Buy milk".to_owned()],
        "refresh reloads tasks after reset"
    );
    Ok(())
}

//! Archiving, restoring and purging tasks end to end.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use rstest::rstest;
use taskboard::board::adapters::memory::InMemoryTaskRemote;

use super::helpers::{board_over, column_titles, id_of, new_task, remote};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_task_reloads_into_the_archive(
    remote: Arc<InMemoryTaskRemote>,
) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Buy milk")?)?;
    board.create_task(new_task("Write report")?)?;
    board.settle().await;
    let report = id_of(&board, "Write report")?;

    eyre::ensure!(board.archive_task(&report), "task should archive");
    board.settle().await;

    let mut reloaded = board_over(&remote);
    let summary = reloaded
        .refresh()
        .await
        .ok_or_else(|| eyre::eyre!("refresh failed"))?;
    eyre::ensure!(summary.active == 1 && summary.archived == 1, "unexpected {summary:?}");
    let record = reloaded
        .archive()
        .get(&report)
        .ok_or_else(|| eyre::eyre!("archived task missing"))?;
    eyre::ensure!(
        record.days_archived(DefaultClock.utc()) <= 1,
        "task was archived moments ago"
    );
    eyre::ensure!(!reloaded.tasks().contains(&report), "task must not be active");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_returns_task_to_its_column(remote: Arc<InMemoryTaskRemote>) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Write report")?.with_status("In Progress"))?;
    board.settle().await;
    let report = id_of(&board, "Write report")?;
    board.archive_task(&report);
    board.settle().await;

    eyre::ensure!(board.restore_task(&report)?, "task should restore");
    board.settle().await;

    let mut reloaded = board_over(&remote);
    reloaded.refresh().await;
    eyre::ensure!(reloaded.archive().is_empty(), "archive should be empty");
    eyre::ensure!(
        column_titles(&reloaded, "In Progress") == vec!["Write report".to_owned()],
        "task should be back in progress"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_after_column_removal_lands_in_to_do(
    remote: Arc<InMemoryTaskRemote>,
) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.add_column("Review")?;
    board.create_task(new_task("Proofread chapter")?.with_status("Review"))?;
    board.settle().await;
    let chapter = id_of(&board, "Proofread chapter")?;
    board.archive_task(&chapter);
    board.remove_column("Review")?;
    board.settle().await;

    board.restore_task(&chapter)?;
    board.settle().await;

    let mut reloaded = board_over(&remote);
    reloaded.refresh().await;
    eyre::ensure!(
        !reloaded.columns().contains("Review"),
        "restored task should not resurrect the column"
    );
    eyre::ensure!(
        column_titles(&reloaded, "To Do") == vec!["Proofread chapter".to_owned()],
        "task should land in To Do"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn purged_task_is_gone_everywhere(remote: Arc<InMemoryTaskRemote>) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Buy milk")?)?;
    board.settle().await;
    let milk = id_of(&board, "Buy milk")?;
    board.archive_task(&milk);
    board.settle().await;

    eyre::ensure!(board.permanently_delete_task(&milk), "task should be purged");
    board.settle().await;

    let mut reloaded = board_over(&remote);
    let summary = reloaded
        .refresh()
        .await
        .ok_or_else(|| eyre::eyre!("refresh failed"))?;
    eyre::ensure!(summary.active == 0 && summary.archived == 0, "unexpected {summary:?}");
    Ok(())
}

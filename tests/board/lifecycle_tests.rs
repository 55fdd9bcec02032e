//! Creating, editing and moving tasks, checked against a fresh reload.

use std::sync::Arc;

use rstest::rstest;
use taskboard::board::{
    adapters::memory::{IdField, InMemoryTaskRemote},
    domain::{TaskFilter, TaskPatch},
};

use super::helpers::{board_over, column_titles, id_of, new_task, remote, task_titled};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_survive_a_reload(remote: Arc<InMemoryTaskRemote>) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.add_column("Review")?;
    board.create_task(new_task("Buy milk")?)?;
    board.create_task(new_task("Proofread chapter")?.with_status("Review"))?;
    board.create_task(
        new_task("Write report")?
            .with_description("Quarterly numbers")
            .with_category("work"),
    )?;
    board.settle().await;

    let mut reloaded = board_over(&remote);
    let summary = reloaded
        .refresh()
        .await
        .ok_or_else(|| eyre::eyre!("refresh failed"))?;

    eyre::ensure!(summary.active == 3, "expected 3 active, got {}", summary.active);
    eyre::ensure!(
        reloaded.columns().contains("Review"),
        "column for fetched status should be added"
    );
    eyre::ensure!(
        column_titles(&reloaded, "Review") == vec!["Proofread chapter".to_owned()],
        "Review column should hold the proofreading task"
    );
    let report = task_titled(&reloaded, "Write report")?;
    eyre::ensure!(report.description() == Some("Quarterly numbers"), "description lost");
    eyre::ensure!(report.category() == Some("work"), "category lost");
    eyre::ensure!(
        board.tasks().iter().all(|task| !task.id().is_provisional()),
        "every create should be confirmed"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moves_and_edits_reach_the_service(remote: Arc<InMemoryTaskRemote>) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Buy milk")?)?;
    board.settle().await;
    let milk = id_of(&board, "Buy milk")?;

    eyre::ensure!(board.change_status(&milk, "In Progress")?, "task should move");
    eyre::ensure!(
        board.edit_task(&milk, TaskPatch::new().with_title("Buy oat milk"))?,
        "task should be edited"
    );
    board.settle().await;

    let mut reloaded = board_over(&remote);
    reloaded.refresh().await;
    eyre::ensure!(
        column_titles(&reloaded, "In Progress") == vec!["Buy oat milk".to_owned()],
        "reload should show the edited task in its new column"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_column_persists_reassignment(
    remote: Arc<InMemoryTaskRemote>,
) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.add_column("Design")?;
    board.create_task(new_task("Sketch logo")?.with_status("Design"))?;
    board.settle().await;

    let removal = board.remove_column("Design")?;
    board.settle().await;

    eyre::ensure!(removal.reassigned.len() == 1, "one task should move");
    let mut reloaded = board_over(&remote);
    reloaded.refresh().await;
    eyre::ensure!(
        !reloaded.columns().contains("Design"),
        "no fetched task should reference the removed column"
    );
    eyre::ensure!(
        column_titles(&reloaded, "To Do") == vec!["Sketch logo".to_owned()],
        "task should land in To Do"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_identifiers_are_normalized() -> eyre::Result<()> {
    let remote = Arc::new(InMemoryTaskRemote::with_id_field(IdField::Legacy));
    let mut board = board_over(&remote);
    board.create_task(new_task("Buy milk")?)?;
    board.settle().await;
    let milk = id_of(&board, "Buy milk")?;

    eyre::ensure!(milk.as_str() == "1", "confirmed id should come from taskId");
    eyre::ensure!(board.archive_task(&milk), "task should archive");
    board.settle().await;
    eyre::ensure!(board.notifications().is_empty(), "archive should succeed remotely");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_filters_the_board_view(remote: Arc<InMemoryTaskRemote>) -> eyre::Result<()> {
    let mut board = board_over(&remote);
    board.create_task(new_task("Buy milk")?.with_category("home"))?;
    board.create_task(new_task("Milk prices report")?.with_status("In Progress"))?;
    board.create_task(new_task("Call plumber")?.with_category("home"))?;
    board.settle().await;

    board.search("MILK");
    let matches = board.search_results().len();
    board.set_filters(vec![TaskFilter::Category("home".to_owned())]);
    let narrowed = board.search_results().len();
    board.clear_search();

    eyre::ensure!(matches == 2, "expected 2 matches, got {matches}");
    eyre::ensure!(narrowed == 1, "expected 1 filtered match, got {narrowed}");
    eyre::ensure!(board.tasks().len() == 3, "search must not change tasks");
    Ok(())
}

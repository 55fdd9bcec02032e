//! HTTP task service adapter tests against a mock server.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use taskboard::board::{
    adapters::http::HttpTaskRemote,
    domain::{NewTask, TaskFields, TaskId},
    ports::{RemoteError, TaskRemote},
    services::Board,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_ROOT: &str = "/api/v1";

fn remote_for(server: &MockServer) -> eyre::Result<HttpTaskRemote> {
    Ok(HttpTaskRemote::new(
        format!("{}{API_ROOT}/", server.uri()),
        Duration::from_secs(5),
    )?)
}

fn fields() -> eyre::Result<TaskFields> {
    Ok(TaskFields {
        title: "Buy milk".to_owned(),
        description: None,
        status: "To Do".to_owned(),
        category: Some("home".to_owned()),
        due_date: NaiveDate::from_ymd_opt(2026, 3, 20),
        created_date: NaiveDate::from_ymd_opt(2026, 3, 14)
            .ok_or_else(|| eyre::eyre!("invalid date"))?,
        last_modified: Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
            .single()
            .ok_or_else(|| eyre::eyre!("invalid instant"))?,
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_tasks_reads_fetch_endpoint() -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/fetch")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"taskId": 1, "taskTitle": "Buy milk", "taskStatus": "To Do"},
            {"id": "2", "taskTitle": "Write report", "taskStatus": "Design"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = remote_for(&server)?.list_tasks().await?;

    eyre::ensure!(records.len() == 2, "expected two records");
    eyre::ensure!(
        records.first().and_then(|r| r.get("taskId")) == Some(&json!(1)),
        "records are returned raw"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_archive_body_is_an_empty_list() -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/status/archived")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let records = remote_for(&server)?.list_archived_tasks().await?;

    eyre::ensure!(records.is_empty(), "expected no records");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_posts_service_field_names() -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API_ROOT}/save")))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "taskTitle": "Buy milk",
            "taskStatus": "To Do",
            "taskCategory": "home",
            "taskDueDate": "2026-03-20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "taskId": 17,
            "taskTitle": "Buy milk",
            "taskStatus": "To Do"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = remote_for(&server)?
        .with_token("secret")
        .create_task(&fields()?)
        .await?;

    eyre::ensure!(record.get("taskId") == Some(&json!(17)), "stored record returned");
    Ok(())
}

#[rstest]
#[case(401)]
#[case(403)]
#[tokio::test(flavor = "multi_thread")]
async fn authorization_statuses_map_to_distinct_errors(#[case] status: u16) -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{API_ROOT}/archive/5")))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let result = remote_for(&server)?.archive_task(&TaskId::from(5)).await;

    match (status, result) {
        (401, Err(RemoteError::Unauthorized)) | (403, Err(RemoteError::Forbidden)) => Ok(()),
        (_, other) => Err(eyre::eyre!("unexpected outcome {other:?} for {status}")),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_maps_to_not_found() -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{API_ROOT}/update/9")))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such task"))
        .mount(&server)
        .await;

    let result = remote_for(&server)?
        .update_task(&TaskId::from(9), &fields()?)
        .await;

    eyre::ensure!(
        matches!(result, Err(RemoteError::NotFound(ref id)) if id.as_str() == "9"),
        "expected NotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_lifecycle_uses_expected_routes() -> eyre::Result<()> {
    let server = MockServer::start().await;
    for (verb, route) in [
        ("PUT", "restore/4"),
        ("DELETE", "permanent/4"),
        ("DELETE", "delete/4"),
    ] {
        Mock::given(method(verb))
            .and(path(format!("{API_ROOT}/{route}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    let remote = remote_for(&server)?;
    let id = TaskId::from(4);

    remote.restore_task(&id).await?;
    remote.permanently_delete_task(&id).await?;
    remote.delete_task(&id).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_body_is_malformed() -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/fetch")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = remote_for(&server)?.list_tasks().await;

    eyre::ensure!(
        matches!(result, Err(RemoteError::Malformed(_))),
        "expected Malformed, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_service_is_a_network_error() -> eyre::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?;
    drop(listener);
    let remote = HttpTaskRemote::new(format!("http://{address}{API_ROOT}"), Duration::from_secs(5))?;

    let result = remote.list_tasks().await;

    eyre::ensure!(
        matches!(result, Err(ref err) if err.is_retryable() && matches!(err, RemoteError::Network(_))),
        "expected a network error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_confirms_create_through_http() -> eyre::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API_ROOT}/save")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "taskId": "42",
            "taskTitle": "Buy milk",
            "taskStatus": "To Do"
        })))
        .mount(&server)
        .await;
    let mut board = Board::new(Arc::new(remote_for(&server)?), Arc::new(DefaultClock));
    let due = NaiveDate::from_ymd_opt(2026, 3, 20).ok_or_else(|| eyre::eyre!("invalid date"))?;

    let provisional = board.create_task(NewTask::new("Buy milk").with_due_date(due))?;
    board.settle().await;

    eyre::ensure!(!board.tasks().contains(&provisional), "provisional id replaced");
    eyre::ensure!(board.tasks().contains(&TaskId::from(42)), "confirmed id adopted");
    Ok(())
}

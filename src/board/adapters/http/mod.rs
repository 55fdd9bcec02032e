//! REST client for the task service API.
//!
//! Endpoints are resolved against a base URL such as
//! `http://localhost:8080/api/v1`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list active | `GET /fetch` |
//! | create | `POST /save` |
//! | update | `PATCH /update/{id}` |
//! | delete | `DELETE /delete/{id}` |
//! | archive | `PATCH /archive/{id}` |
//! | list archived | `GET /status/archived` |
//! | restore | `PUT /restore/{id}` |
//! | permanent delete | `DELETE /permanent/{id}` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use tracing::debug;

use crate::board::{
    domain::{RawTaskRecord, TaskFields, TaskId},
    ports::{RemoteError, RemoteResult, TaskRemote},
};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Task collaborator backed by the task service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTaskRemote {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTaskRemote {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Backend`] when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteError::backend)?;
        let raw: String = base_url.into();
        Ok(Self {
            client,
            base_url: raw.trim_end_matches('/').to_owned(),
            token: None,
        })
    }

    /// Sends `token` as a bearer credential on every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(method = %method, url = %url, "task service request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, id: Option<&TaskId>) -> RemoteResult<String> {
        let response = builder
            .send()
            .await
            .map_err(|err| RemoteError::Network(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RemoteError::Network(err.to_string()))?;
        classify(status, &body, id)?;
        Ok(body)
    }

    async fn send_for_records(&self, builder: RequestBuilder) -> RemoteResult<Vec<RawTaskRecord>> {
        let body = self.send(builder, None).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Maps a response status to the collaborator error taxonomy.
///
/// `id` names the addressed task so a 404 can report it; without one a 404
/// is reported as a rejection.
///
/// # Errors
///
/// Returns [`RemoteError::Unauthorized`] for 401, [`RemoteError::Forbidden`]
/// for 403, [`RemoteError::NotFound`] for 404 on a task-addressed call, and
/// [`RemoteError::Rejected`] for any other non-success status.
pub fn classify(status: StatusCode, body: &str, id: Option<&TaskId>) -> RemoteResult<()> {
    if status.is_success() {
        return Ok(());
    }
    match (status, id) {
        (StatusCode::UNAUTHORIZED, _) => Err(RemoteError::Unauthorized),
        (StatusCode::FORBIDDEN, _) => Err(RemoteError::Forbidden),
        (StatusCode::NOT_FOUND, Some(task_id)) => Err(RemoteError::NotFound(task_id.clone())),
        _ => Err(RemoteError::Rejected {
            status: status.as_u16(),
            message: body.trim().to_owned(),
        }),
    }
}

#[async_trait]
impl TaskRemote for HttpTaskRemote {
    async fn list_tasks(&self) -> RemoteResult<Vec<RawTaskRecord>> {
        self.send_for_records(self.request(Method::GET, "/fetch"))
            .await
    }

    async fn create_task(&self, fields: &TaskFields) -> RemoteResult<RawTaskRecord> {
        let builder = self.request(Method::POST, "/save").json(fields);
        let body = self.send(builder, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn update_task(&self, id: &TaskId, fields: &TaskFields) -> RemoteResult<()> {
        let builder = self
            .request(Method::PATCH, &format!("/update/{id}"))
            .json(fields);
        self.send(builder, Some(id)).await.map(drop)
    }

    async fn delete_task(&self, id: &TaskId) -> RemoteResult<()> {
        let builder = self.request(Method::DELETE, &format!("/delete/{id}"));
        self.send(builder, Some(id)).await.map(drop)
    }

    async fn archive_task(&self, id: &TaskId) -> RemoteResult<()> {
        let builder = self.request(Method::PATCH, &format!("/archive/{id}"));
        self.send(builder, Some(id)).await.map(drop)
    }

    async fn list_archived_tasks(&self) -> RemoteResult<Vec<RawTaskRecord>> {
        self.send_for_records(self.request(Method::GET, "/status/archived"))
            .await
    }

    async fn restore_task(&self, id: &TaskId) -> RemoteResult<()> {
        let builder = self.request(Method::PUT, &format!("/restore/{id}"));
        self.send(builder, Some(id)).await.map(drop)
    }

    async fn permanently_delete_task(&self, id: &TaskId) -> RemoteResult<()> {
        let builder = self.request(Method::DELETE, &format!("/permanent/{id}"));
        self.send(builder, Some(id)).await.map(drop)
    }
}

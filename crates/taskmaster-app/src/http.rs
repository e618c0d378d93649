//! REST client for a real task backend.
//!
//! | Operation | Request |
//! |---|---|
//! | list | `GET /api/tasks` → `{ tasks }` |
//! | create | `POST /api/tasks` → `{ task, message }` |
//! | update | `PUT /api/tasks/:id` → `{ task, message }` |
//! | delete | `DELETE /api/tasks/:id` → `{ message }` |

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use taskmaster_core::{Task, TaskId, TaskInput};
use tracing::debug;

use crate::error::RepositoryError;
use crate::repository::TaskRepository;

#[derive(Debug, Deserialize)]
struct ListResponse {
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    task: Task,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

/// Repository that talks JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskRepository {
    client: Client,
    base_url: Url,
}

impl HttpTaskRepository {
    /// Build a client rooted at `base_url` (scheme, host and optional path prefix).
    ///
    /// # Errors
    /// Returns [`RepositoryError::Network`] if the URL is unusable or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RepositoryError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| RepositoryError::network(format!("invalid base url {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::network(format!("invalid base url: {base_url}")));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// URL of the task collection.
    #[must_use]
    pub fn collection_url(&self) -> Url {
        self.endpoint(&["api", "tasks"])
    }

    /// URL of a single task; the id is percent-encoded as one path segment.
    #[must_use]
    pub fn task_url(&self, id: &TaskId) -> Url {
        self.endpoint(&["api", "tasks", id.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl TaskRepository for HttpTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let response = self.client.get(self.collection_url()).send().await?;
        let body: ListResponse = read_json(response, None).await?;
        debug!(count = body.tasks.len(), "fetched tasks");
        Ok(body.tasks)
    }

    async fn create(&self, input: &TaskInput) -> Result<Task, RepositoryError> {
        input.validate()?;
        let response = self
            .client
            .post(self.collection_url())
            .json(input)
            .send()
            .await?;
        let body: TaskResponse = read_json(response, None).await?;
        debug!(task = %body.task.id, message = %body.message, "created task");
        Ok(body.task)
    }

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task, RepositoryError> {
        input.validate()?;
        let response = self.client.put(self.task_url(id)).json(input).send().await?;
        let body: TaskResponse = read_json(response, Some(id)).await?;
        debug!(task = %id, message = %body.message, "updated task");
        Ok(body.task)
    }

    async fn delete(&self, id: &TaskId) -> Result<(), RepositoryError> {
        let response = self.client.delete(self.task_url(id)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failure(status, &body, Some(id)));
        }
        // The acknowledgement body is informational only.
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageResponse>(&text)
            .map(|ack| ack.message)
            .unwrap_or_default();
        debug!(task = %id, %message, "deleted task");
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    target: Option<&TaskId>,
) -> Result<T, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await.unwrap_or_default();
    Err(failure(status, &body, target))
}

/// Map a non-success response to a [`RepositoryError`].
///
/// A 404 for a specific task becomes `NotFound`. Anything else becomes `Server`,
/// carrying the body's `message` field when there is one.
#[must_use]
pub fn failure(status: StatusCode, body: &str, target: Option<&TaskId>) -> RepositoryError {
    if status == StatusCode::NOT_FOUND
        && let Some(id) = target
    {
        return RepositoryError::NotFound(id.clone());
    }
    let message = serde_json::from_str::<MessageResponse>(body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
        });
    RepositoryError::Server {
        status: status.as_u16(),
        message,
    }
}

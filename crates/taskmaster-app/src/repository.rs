//! Backend contract for task persistence.

use std::sync::Arc;

use taskmaster_core::{Task, TaskId, TaskInput};

use crate::error::RepositoryError;

/// Async list/create/update/delete over the task resource.
///
/// Implementations own no session state beyond what they persist; the
/// [`crate::TaskStore`] keeps the authoritative list for a session.
#[allow(async_fn_in_trait)]
pub trait TaskRepository: Send + Sync {
    /// Fetch every task. No ordering is guaranteed.
    ///
    /// # Errors
    /// Returns a transport or server error when the backend fails.
    async fn list(&self) -> Result<Vec<Task>, RepositoryError>;

    /// Persist a new task and return it with id and timestamps assigned.
    ///
    /// # Errors
    /// Returns a validation error for a blank title, or a transport/server error.
    async fn create(&self, input: &TaskInput) -> Result<Task, RepositoryError>;

    /// Overwrite the editable fields of an existing task.
    ///
    /// The returned task keeps its id and `created_at`; `updated_at` is refreshed.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] when `id` is unknown.
    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task, RepositoryError>;

    /// Remove a task.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] when `id` is unknown, including on a repeated delete.
    async fn delete(&self, id: &TaskId) -> Result<(), RepositoryError>;
}

impl<R: TaskRepository> TaskRepository for Arc<R> {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.as_ref().list().await
    }

    async fn create(&self, input: &TaskInput) -> Result<Task, RepositoryError> {
        self.as_ref().create(input).await
    }

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task, RepositoryError> {
        self.as_ref().update(id, input).await
    }

    async fn delete(&self, id: &TaskId) -> Result<(), RepositoryError> {
        self.as_ref().delete(id).await
    }
}

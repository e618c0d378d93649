//! Session-scoped task list reconciled against a repository.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use taskmaster_core::{Dashboard, Task, TaskFilter, TaskId, TaskInput, TaskView, ValidationError, derive_view};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::RepositoryError;
use crate::repository::TaskRepository;

/// Which store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Fetching the task list.
    Load,
    /// Creating a task.
    Create,
    /// Editing or toggling a task.
    Update,
    /// Deleting a task.
    Delete,
}

impl OperationKind {
    /// Notification text for a failed operation of this kind.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load tasks",
            Self::Create => "Failed to create task",
            Self::Update => "Failed to update task",
            Self::Delete => "Failed to delete task",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Underlying cause of a [`StoreError`].
#[derive(Debug, Error)]
pub enum StoreFailure {
    /// Input was rejected before reaching the repository.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The repository call failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A failed store operation. State is left exactly as it was before the call.
///
/// The message already carries the cause, so no separate error source is reported.
#[derive(Debug, Error)]
#[error("{}: {}", .kind.user_message(), .cause)]
pub struct StoreError {
    kind: OperationKind,
    cause: StoreFailure,
}

impl StoreError {
    fn new(kind: OperationKind, cause: impl Into<StoreFailure>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    /// Operation that failed.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Underlying cause.
    #[must_use]
    pub const fn failure(&self) -> &StoreFailure {
        &self.cause
    }

    /// Generic notification text, e.g. "Failed to update task".
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }

    /// Message of the underlying cause, unmodified.
    #[must_use]
    pub fn detail(&self) -> String {
        self.cause.to_string()
    }

    /// The validation error, when the input never left the store.
    #[must_use]
    pub const fn validation(&self) -> Option<ValidationError> {
        match &self.cause {
            StoreFailure::Validation(err) => Some(*err),
            StoreFailure::Repository(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    loads_in_flight: usize,
}

/// Authoritative in-memory task list for one session.
///
/// Mutations go through the repository and are applied locally only on success.
/// The state lock is never held across an `.await`, so readers stay responsive
/// while calls are in flight. Concurrent mutations of the same task race; the
/// last response to arrive wins.
pub struct TaskStore<R> {
    repository: R,
    state: RwLock<StoreState>,
}

/// Counts one load as in flight until dropped, including when the load future is dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a RwLock<StoreState>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(state: &'a RwLock<StoreState>) -> Self {
        state.write().unwrap_or_else(PoisonError::into_inner).loads_in_flight += 1;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
    }
}

impl<R> TaskStore<R> {
    /// Empty store over `repository`. Call [`TaskStore::load`] to populate it.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// The backing repository.
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current list, in stored order.
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    /// Whether any load is in flight.
    pub fn is_loading(&self) -> bool {
        self.read().loads_in_flight > 0
    }

    /// Current copy of a single task.
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.read().tasks.iter().find(|task| &task.id == id).cloned()
    }

    /// Filtered, sorted view with counts.
    pub fn view(&self, filter: TaskFilter) -> TaskView {
        derive_view(&self.read().tasks, filter)
    }

    /// Full presentation model as of `now`.
    pub fn dashboard(&self, filter: TaskFilter, now: OffsetDateTime) -> Dashboard {
        Dashboard::build(&self.read().tasks, filter, now)
    }
}

impl<R: TaskRepository> TaskStore<R> {
    /// Replace the list with whatever the repository returns.
    ///
    /// Overlapping loads are not merged; the last response to arrive wins, and
    /// [`TaskStore::is_loading`] stays true until every one of them has finished.
    ///
    /// # Errors
    /// Returns a [`OperationKind::Load`] error; the previous list is kept.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let _loading = LoadingGuard::enter(&self.state);

        match self.repository.list().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.write().tasks = tasks;
                info!(count, "tasks loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                Err(StoreError::new(OperationKind::Load, err))
            }
        }
    }

    /// Validate and create a task, appending it on success.
    ///
    /// # Errors
    /// Returns a [`OperationKind::Create`] error; invalid input never reaches the repository.
    pub async fn create(&self, input: TaskInput) -> Result<Task, StoreError> {
        input
            .validate()
            .map_err(|err| StoreError::new(OperationKind::Create, err))?;

        match self.repository.create(&input).await {
            Ok(task) => {
                info!(task = %task.id, "task created");
                self.write().tasks.push(task.clone());
                Ok(task)
            }
            Err(err) => {
                warn!(error = %err, "failed to create task");
                Err(StoreError::new(OperationKind::Create, err))
            }
        }
    }

    /// Validate and update a task, replacing the local copy on success.
    ///
    /// # Errors
    /// Returns a [`OperationKind::Update`] error and leaves the list untouched.
    pub async fn update(&self, id: &TaskId, input: TaskInput) -> Result<Task, StoreError> {
        input
            .validate()
            .map_err(|err| StoreError::new(OperationKind::Update, err))?;

        match self.repository.update(id, &input).await {
            Ok(task) => {
                info!(task = %id, "task updated");
                self.replace(id, &task);
                Ok(task)
            }
            Err(err) => {
                warn!(task = %id, error = %err, "failed to update task");
                Err(StoreError::new(OperationKind::Update, err))
            }
        }
    }

    /// Flip the completion flag of a task.
    ///
    /// Returns `Ok(None)` without calling the repository when `id` is not in the list.
    ///
    /// # Errors
    /// Returns a [`OperationKind::Update`] error and leaves the list untouched.
    pub async fn toggle_complete(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let Some(current) = self.get(id) else {
            return Ok(None);
        };
        let input = current.toggled_input();
        info!(task = %id, completed = input.completed, "toggling completion");
        self.update(id, input).await.map(Some)
    }

    /// Delete a task, removing it locally on success.
    ///
    /// # Errors
    /// Returns a [`OperationKind::Delete`] error and leaves the list untouched.
    pub async fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        match self.repository.delete(id).await {
            Ok(()) => {
                info!(task = %id, "task deleted");
                self.write().tasks.retain(|task| &task.id != id);
                Ok(())
            }
            Err(err) => {
                warn!(task = %id, error = %err, "failed to delete task");
                Err(StoreError::new(OperationKind::Delete, err))
            }
        }
    }

    fn replace(&self, id: &TaskId, task: &Task) {
        let mut state = self.write();
        if let Some(slot) = state.tasks.iter_mut().find(|existing| &existing.id == id) {
            slot.clone_from(task);
        }
    }
}

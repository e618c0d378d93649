//! In-memory repository that simulates a remote task API.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use taskmaster_core::{Task, TaskId, TaskInput};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidIds};
use crate::error::RepositoryError;
use crate::repository::TaskRepository;

/// Artificial response delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// Delay before `list` resolves.
    pub list: StdDuration,
    /// Delay before `create`, `update` and `delete` resolve.
    pub mutation: StdDuration,
}

impl Latency {
    /// Resolve immediately.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            list: StdDuration::ZERO,
            mutation: StdDuration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            list: StdDuration::from_millis(800),
            mutation: StdDuration::from_millis(500),
        }
    }
}

/// Repository backed by a task table owned by this instance.
///
/// Time and identifiers come from injected sources so tests can be deterministic.
pub struct MockTaskRepository {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: Latency,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    tasks: Vec<Task>,
    fail_next: Option<RepositoryError>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Empty repository on the system clock with UUID ids and default latency.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIds),
            latency: Latency::default(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Use the given clock for timestamps and seeding.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use the given identifier source for created tasks.
    #[must_use]
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Override the artificial latency.
    #[must_use]
    pub const fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the table contents.
    #[must_use]
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.lock().tasks = tasks;
        self
    }

    /// Replace the table contents with [`seed_tasks`] relative to the current clock.
    #[must_use]
    pub fn with_seed(self) -> Self {
        let seed = seed_tasks(self.clock.now());
        self.with_tasks(seed)
    }

    /// Make the next call (of any kind) fail with `error`.
    pub fn fail_next(&self, error: RepositoryError) {
        self.lock().fail_next = Some(error);
    }

    /// Copy of the table, bypassing latency and failure injection.
    #[must_use]
    pub fn stored_tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate(&self, delay: StdDuration) -> Result<MutexGuard<'_, MockState>, RepositoryError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.lock();
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

impl TaskRepository for MockTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let state = self.simulate(self.latency.list).await?;
        debug!(count = state.tasks.len(), "mock list");
        Ok(state.tasks.clone())
    }

    async fn create(&self, input: &TaskInput) -> Result<Task, RepositoryError> {
        let mut state = self.simulate(self.latency.mutation).await?;
        input.validate()?;
        let now = self.clock.now();
        let task = Task {
            id: self.ids.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            due_date: input.due_date,
            completed: input.completed,
            created_at: now,
            updated_at: now,
        };
        debug!(task = %task.id, "mock create");
        state.tasks.push(task.clone());
        drop(state);
        Ok(task)
    }

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task, RepositoryError> {
        let mut state = self.simulate(self.latency.mutation).await?;
        input.validate()?;
        let now = self.clock.now();
        let stored = state
            .tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        stored.title.clone_from(&input.title);
        stored.description.clone_from(&input.description);
        stored.due_date = input.due_date;
        stored.completed = input.completed;
        stored.updated_at = now.max(stored.created_at);
        debug!(task = %id, completed = stored.completed, "mock update");
        let updated = stored.clone();
        drop(state);
        Ok(updated)
    }

    async fn delete(&self, id: &TaskId) -> Result<(), RepositoryError> {
        let mut state = self.simulate(self.latency.mutation).await?;
        let position = state
            .tasks
            .iter()
            .position(|task| &task.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        state.tasks.remove(position);
        drop(state);
        debug!(task = %id, "mock delete");
        Ok(())
    }
}

/// Five demo tasks with ids "1".."5", due dates relative to `now`.
///
/// Three are open (one of them due yesterday) and two are completed.
#[must_use]
pub fn seed_tasks(now: OffsetDateTime) -> Vec<Task> {
    let entry = |id: &str, title: &str, description: &str, due_in_days: i64, completed: bool| Task {
        id: TaskId::new(id),
        title: title.to_owned(),
        description: description.to_owned(),
        due_date: now + Duration::days(due_in_days),
        completed,
        created_at: now,
        updated_at: now,
    };
    vec![
        entry(
            "1",
            "Complete project proposal",
            "Write and submit the Q4 project proposal for the new marketing campaign",
            1,
            false,
        ),
        entry(
            "2",
            "Review team performance",
            "Conduct quarterly performance reviews for all team members",
            2,
            false,
        ),
        entry(
            "3",
            "Update website content",
            "Refresh the about page and add new testimonials",
            -1,
            false,
        ),
        entry(
            "4",
            "Prepare presentation slides",
            "Create slides for the monthly board meeting",
            0,
            true,
        ),
        entry(
            "5",
            "Schedule team meeting",
            "Organize next week's sprint planning session",
            3,
            true,
        ),
    ]
}

//! Runtime choice between the simulated and the HTTP repository.

use anyhow::{Context, Result, anyhow};
use taskmaster_core::{Task, TaskId, TaskInput};
use tracing::info;

use crate::config::{AppConfig, BackendKind};
use crate::error::RepositoryError;
use crate::http::HttpTaskRepository;
use crate::mock::MockTaskRepository;
use crate::repository::TaskRepository;

/// Repository selected from configuration.
pub enum Backend {
    /// In-memory simulation.
    Mock(MockTaskRepository),
    /// REST client.
    Http(HttpTaskRepository),
}

impl Backend {
    /// Build the backend described by `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config.backend.kind {
            BackendKind::Mock => {
                let repo = MockTaskRepository::new().with_latency(config.mock.latency());
                let repo = if config.mock.seed { repo.with_seed() } else { repo };
                info!(seeded = config.mock.seed, "using mock backend");
                Ok(Self::Mock(repo))
            }
            BackendKind::Http => {
                let base_url = config
                    .backend
                    .base_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("backend.base_url is required for the http backend"))?;
                let repo = HttpTaskRepository::new(base_url, config.backend.timeout())
                    .with_context(|| format!("failed to set up http backend for {base_url}"))?;
                info!(%base_url, "using http backend");
                Ok(Self::Http(repo))
            }
        }
    }

    /// Short name for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Mock(_) => BackendKind::Mock,
            Self::Http(_) => BackendKind::Http,
        }
    }
}

impl TaskRepository for Backend {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        match self {
            Self::Mock(repo) => repo.list().await,
            Self::Http(repo) => repo.list().await,
        }
    }

    async fn create(&self, input: &TaskInput) -> Result<Task, RepositoryError> {
        match self {
            Self::Mock(repo) => repo.create(input).await,
            Self::Http(repo) => repo.create(input).await,
        }
    }

    async fn update(&self, id: &TaskId, input: &TaskInput) -> Result<Task, RepositoryError> {
        match self {
            Self::Mock(repo) => repo.update(id, input).await,
            Self::Http(repo) => repo.update(id, input).await,
        }
    }

    async fn delete(&self, id: &TaskId) -> Result<(), RepositoryError> {
        match self {
            Self::Mock(repo) => repo.delete(id).await,
            Self::Http(repo) => repo.delete(id).await,
        }
    }
}

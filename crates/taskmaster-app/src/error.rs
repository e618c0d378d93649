//! Error types for task repository operations.

use taskmaster_core::{TaskId, ValidationError};
use thiserror::Error;

/// Errors a [`crate::TaskRepository`] can report.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The referenced task does not exist.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// The backend could not be reached.
    #[error("{0}")]
    Network(String),

    /// The backend answered with a failure status.
    #[error("{message}")]
    Server {
        /// HTTP status code (or a synthetic one for simulated failures).
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// The backend answered with a body that could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The backend rejected the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RepositoryError {
    /// Transport failure with the given display message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Whether the failure was a missing task.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

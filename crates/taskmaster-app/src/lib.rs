//! Application layer for taskmaster.
//!
//! This crate provides the repository contract and its implementations, the
//! session task store, and configuration shared by front-ends.

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod repository;
pub mod store;

// Re-exports for convenience
pub use backend::Backend;
pub use clock::{Clock, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidIds};
pub use config::{AppConfig, BackendConfig, BackendKind, MockConfig};
pub use error::RepositoryError;
pub use http::HttpTaskRepository;
pub use mock::{Latency, MockTaskRepository, seed_tasks};
pub use repository::TaskRepository;
pub use store::{OperationKind, StoreError, StoreFailure, TaskStore};

//! Domain types, validation and view derivation for taskmaster.

/// Dashboard presentation model.
pub mod dashboard;
/// Due-date predicates and labels.
pub mod due;
/// Filter modes and the aggregation engine.
pub mod filter;
/// Identifier types.
pub mod id;
/// Task entity and inputs.
pub mod task;

pub use dashboard::{Dashboard, DashboardRow};
pub use due::{DueLabel, DueStatus, is_overdue, start_of_day};
pub use filter::{ParseFilterError, TaskCounts, TaskFilter, TaskView, derive_view};
pub use id::TaskId;
pub use task::{Task, TaskDraft, TaskInput, ValidationError};

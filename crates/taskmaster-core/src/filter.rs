//! View selection and aggregate counts over a task list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::Task;

/// Which subset of tasks to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not completed.
    Pending,
    /// Tasks that are completed.
    Completed,
}

impl TaskFilter {
    /// All filter modes in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Pending, Self::Completed];

    /// Token used on the command line and in serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Label shown on the filter tab.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Tasks",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }

    /// Message shown when the filtered list is empty.
    #[must_use]
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::All => "No tasks yet",
            Self::Pending => "No pending tasks",
            Self::Completed => "No completed tasks",
        }
    }

    /// Whether the task belongs to this view.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a filter token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter: {token} (expected all, pending or completed)")]
pub struct ParseFilterError {
    token: String,
}

impl FromStr for TaskFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFilterError { token: s.to_owned() }),
        }
    }
}

/// Number of tasks per filter mode. `pending + completed == all` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    /// Every task.
    pub all: usize,
    /// Open tasks.
    pub pending: usize,
    /// Finished tasks.
    pub completed: usize,
}

impl TaskCounts {
    /// Count a task list.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            all: tasks.len(),
            pending: tasks.len() - completed,
            completed,
        }
    }

    /// Count for a single filter mode.
    #[must_use]
    pub const fn get(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.all,
            TaskFilter::Pending => self.pending,
            TaskFilter::Completed => self.completed,
        }
    }

    /// Completed share in whole percent, rounded half up. Zero for an empty list.
    #[must_use]
    pub const fn completion_percent(&self) -> usize {
        if self.all == 0 {
            return 0;
        }
        (self.completed * 200 + self.all) / (self.all * 2)
    }
}

/// Result of [`derive_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Tasks matching the filter, earliest due date first.
    pub visible: Vec<Task>,
    /// Counts over the unfiltered list.
    pub counts: TaskCounts,
}

/// Filter and sort a task list without touching the input.
///
/// The sort is stable, so tasks sharing a due date keep their input order.
#[must_use]
pub fn derive_view(tasks: &[Task], filter: TaskFilter) -> TaskView {
    let mut visible: Vec<Task> = tasks.iter().filter(|task| filter.matches(task)).cloned().collect();
    visible.sort_by_key(|task| task.due_date);
    TaskView {
        visible,
        counts: TaskCounts::from_tasks(tasks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use std::collections::BTreeSet;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    const BASE: OffsetDateTime = datetime!(2026-10-15 12:00 UTC);

    fn task(id: &str, due_offset_days: i64, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: String::new(),
            due_date: BASE + Duration::days(due_offset_days),
            completed,
            created_at: BASE,
            updated_at: BASE,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    fn mixed() -> Vec<Task> {
        vec![
            task("a", 3, false),
            task("b", -1, true),
            task("c", 0, false),
            task("d", 0, true),
            task("e", 1, false),
            task("f", 0, false),
        ]
    }

    #[test]
    fn parse_filter_tokens() {
        assert_eq!("Pending".parse::<TaskFilter>(), Ok(TaskFilter::Pending));
        assert_eq!(" all ".parse::<TaskFilter>(), Ok(TaskFilter::All));
        assert_eq!("completed".parse::<TaskFilter>(), Ok(TaskFilter::Completed));
        assert!("later".parse::<TaskFilter>().is_err());
        assert!("done".parse::<TaskFilter>().is_err());
        for filter in TaskFilter::ALL {
            assert_eq!(filter.to_string().parse::<TaskFilter>(), Ok(filter));
        }
    }

    #[test]
    fn counts_partition_the_list() {
        let counts = TaskCounts::from_tasks(&mixed());
        assert_eq!(counts, TaskCounts { all: 6, pending: 4, completed: 2 });
        assert_eq!(counts.pending + counts.completed, counts.all);
        assert_eq!(counts.get(TaskFilter::Pending), 4);
    }

    #[test]
    fn pending_and_completed_views_partition_all() {
        let tasks = mixed();
        let all: BTreeSet<_> = derive_view(&tasks, TaskFilter::All)
            .visible
            .into_iter()
            .map(|t| t.id)
            .collect();
        let pending = derive_view(&tasks, TaskFilter::Pending).visible;
        let completed = derive_view(&tasks, TaskFilter::Completed).visible;
        assert!(pending.iter().all(|t| !t.completed));
        assert!(completed.iter().all(|t| t.completed));
        let union: BTreeSet<_> = pending.into_iter().chain(completed).map(|t| t.id).collect();
        assert_eq!(union, all);
    }

    #[test]
    fn sorts_by_due_date_and_keeps_ties_stable() {
        let view = derive_view(&mixed(), TaskFilter::All);
        assert_eq!(ids(&view.visible), vec!["b", "c", "d", "f", "e", "a"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = derive_view(&mixed(), TaskFilter::Pending);
        let twice = derive_view(&once.visible, TaskFilter::Pending);
        assert_eq!(once.visible, twice.visible);
        assert_eq!(ids(&once.visible), vec!["c", "f", "e", "a"]);
    }

    #[test]
    fn does_not_mutate_input_and_is_deterministic() {
        let tasks = mixed();
        let before = tasks.clone();
        let first = derive_view(&tasks, TaskFilter::Completed);
        let second = derive_view(&tasks, TaskFilter::Completed);
        assert_eq!(tasks, before);
        assert_eq!(first, second);
    }

    #[test]
    fn completion_percent_rounds() {
        assert_eq!(TaskCounts::default().completion_percent(), 0);
        assert_eq!(TaskCounts { all: 5, pending: 3, completed: 2 }.completion_percent(), 40);
        assert_eq!(TaskCounts { all: 3, pending: 1, completed: 2 }.completion_percent(), 67);
        assert_eq!(TaskCounts { all: 8, pending: 7, completed: 1 }.completion_percent(), 13);
    }

    #[test]
    fn empty_messages_per_filter() {
        assert_eq!(TaskFilter::All.empty_message(), "No tasks yet");
        assert_eq!(TaskFilter::Pending.empty_message(), "No pending tasks");
        assert_eq!(TaskFilter::Completed.empty_message(), "No completed tasks");
    }
}

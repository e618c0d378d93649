//! Presentation model for a task dashboard.

use time::OffsetDateTime;

use crate::due::{DueLabel, DueStatus};
use crate::filter::{TaskCounts, TaskFilter, derive_view};
use crate::task::Task;

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    /// The task itself.
    pub task: Task,
    /// Relative due date.
    pub due_label: DueLabel,
    /// Urgency classification.
    pub status: DueStatus,
}

impl DashboardRow {
    /// Whether the row carries the overdue badge.
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.status == DueStatus::Overdue
    }
}

/// Everything a front-end needs to draw the task list, stats and filter tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Active filter.
    pub filter: TaskFilter,
    /// Counts over the unfiltered list.
    pub counts: TaskCounts,
    /// Visible rows, earliest due date first.
    pub rows: Vec<DashboardRow>,
}

impl Dashboard {
    /// Derive the dashboard for `tasks` as of `now`.
    #[must_use]
    pub fn build(tasks: &[Task], filter: TaskFilter, now: OffsetDateTime) -> Self {
        let view = derive_view(tasks, filter);
        let rows = view
            .visible
            .into_iter()
            .map(|task| DashboardRow {
                due_label: DueLabel::for_date(task.due_date, now),
                status: DueStatus::for_task(&task, now),
                task,
            })
            .collect();
        Self {
            filter,
            counts: view.counts,
            rows,
        }
    }

    /// Completed share in whole percent.
    #[must_use]
    pub const fn completion_percent(&self) -> usize {
        self.counts.completion_percent()
    }

    /// Message to show instead of rows, if there are none.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.rows.is_empty().then(|| self.filter.empty_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use time::Duration;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-15 10:00 UTC);

    fn task(id: &str, due: OffsetDateTime, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            title: id.into(),
            description: String::new(),
            due_date: due,
            completed,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    #[test]
    fn rows_carry_labels_and_status() {
        let tasks = vec![
            task("late", NOW - Duration::days(1), false),
            task("done", NOW, true),
        ];
        let dashboard = Dashboard::build(&tasks, TaskFilter::All, NOW);
        assert_eq!(dashboard.rows.len(), 2);
        assert!(dashboard.rows[0].is_overdue());
        assert_eq!(dashboard.rows[0].task.id.as_str(), "late");
        assert_eq!(dashboard.rows[1].status, DueStatus::Completed);
        assert_eq!(dashboard.rows[1].due_label, DueLabel::Today);
        assert_eq!(dashboard.completion_percent(), 50);
        assert_eq!(dashboard.empty_message(), None);
    }

    #[test]
    fn empty_view_reports_message_but_keeps_counts() {
        let tasks = vec![task("open", NOW, false)];
        let dashboard = Dashboard::build(&tasks, TaskFilter::Completed, NOW);
        assert!(dashboard.rows.is_empty());
        assert_eq!(dashboard.counts.all, 1);
        assert_eq!(dashboard.empty_message(), Some("No completed tasks"));
    }
}

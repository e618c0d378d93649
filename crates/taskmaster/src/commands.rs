use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use taskmaster_app::{TaskRepository, TaskStore};
use taskmaster_core::task::due_date_format;
use taskmaster_core::{TaskDraft, TaskFilter, TaskId, ValidationError};
use time::OffsetDateTime;

use crate::Command;
use crate::view::{dashboard_json, render_dashboard, render_stats};

/// What to show after a command has been applied.
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
    pub filter: TaskFilter,
    pub notice: Option<&'static str>,
    pub stats_only: bool,
}

impl Outcome {
    const fn dashboard(filter: TaskFilter) -> Self {
        Self {
            filter,
            notice: None,
            stats_only: false,
        }
    }

    const fn with_notice(notice: &'static str) -> Self {
        Self {
            filter: TaskFilter::All,
            notice: Some(notice),
            stats_only: false,
        }
    }
}

pub async fn run<R: TaskRepository>(command: Command, repository: R, json: bool) -> Result<()> {
    let store = TaskStore::new(repository);
    let now = OffsetDateTime::now_utc();
    let outcome = execute(&store, command, now).await?;

    let dashboard = store.dashboard(outcome.filter, now);
    let mut out = std::io::stdout().lock();
    if let Some(notice) = outcome.notice {
        writeln!(out, "{notice}")?;
    }
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&dashboard_json(&dashboard))?)?;
    } else if outcome.stats_only {
        render_stats(&dashboard.counts, &mut out)?;
    } else {
        render_dashboard(&dashboard, &mut out)?;
    }
    Ok(())
}

/// Load the store and apply one intent to it.
pub async fn execute<R: TaskRepository>(
    store: &TaskStore<R>,
    command: Command,
    now: OffsetDateTime,
) -> Result<Outcome> {
    store.load().await?;

    match command {
        Command::List { filter } => Ok(Outcome::dashboard(filter)),
        Command::Stats => Ok(Outcome {
            stats_only: true,
            ..Outcome::dashboard(TaskFilter::All)
        }),
        Command::Add {
            title,
            description,
            due,
            completed,
        } => {
            let mut draft = TaskDraft::blank(now);
            draft.title = title;
            draft.description = description;
            draft.completed = completed;
            if let Some(due) = due {
                draft.due_date = Some(parse_due(&due)?);
            }
            let input = draft.into_input().map_err(field_error)?;
            store.create(input).await?;
            Ok(Outcome::with_notice("Task created successfully"))
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            completed,
        } => {
            let id = TaskId::from(id);
            let current = store.get(&id).ok_or_else(|| anyhow!("Task not found: {id}"))?;
            let mut draft = TaskDraft::from_task(&current);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(due) = due {
                draft.due_date = Some(parse_due(&due)?);
            }
            if let Some(completed) = completed {
                draft.completed = completed;
            }
            let input = draft.into_input().map_err(field_error)?;
            store.update(&id, input).await?;
            Ok(Outcome::with_notice("Task updated successfully"))
        }
        Command::Toggle { id } => {
            let id = TaskId::from(id);
            if store.toggle_complete(&id).await?.is_none() {
                bail!("Task not found: {id}");
            }
            Ok(Outcome::dashboard(TaskFilter::All))
        }
        Command::Rm { id } => {
            store.delete(&TaskId::from(id)).await?;
            Ok(Outcome::with_notice("Task deleted successfully"))
        }
    }
}

fn parse_due(raw: &str) -> Result<OffsetDateTime> {
    due_date_format::parse(raw).with_context(|| format!("invalid due date '{raw}' (expected YYYY-MM-DD or RFC 3339)"))
}

fn field_error(err: ValidationError) -> anyhow::Error {
    anyhow!("{}: {err}", err.field())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taskmaster_app::{Latency, ManualClock, MockTaskRepository, SequentialIds};
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-15 09:00 UTC);

    fn store() -> TaskStore<MockTaskRepository> {
        let repo = MockTaskRepository::new()
            .with_clock(Arc::new(ManualClock::new(NOW)))
            .with_ids(Arc::new(SequentialIds::starting_at(6)))
            .with_latency(Latency::none())
            .with_seed();
        TaskStore::new(repo)
    }

    #[tokio::test]
    async fn add_defaults_due_date_to_tomorrow() {
        let store = store();
        let command = Command::Add {
            title: "Book venue".into(),
            description: String::new(),
            due: None,
            completed: false,
        };
        let outcome = execute(&store, command, NOW).await.expect("add");
        assert_eq!(outcome.notice, Some("Task created successfully"));
        let created = store.get(&TaskId::new("6")).expect("created");
        assert_eq!(created.due_date, datetime!(2026-10-16 00:00 UTC));
    }

    #[tokio::test]
    async fn add_with_blank_title_reports_field() {
        let store = store();
        let command = Command::Add {
            title: " ".into(),
            description: String::new(),
            due: Some("2026-10-20".into()),
            completed: false,
        };
        let err = execute(&store, command, NOW).await.expect_err("blank title");
        assert_eq!(err.to_string(), "title: Task title is required");
        assert_eq!(store.tasks().len(), 5);
    }

    #[tokio::test]
    async fn edit_merges_only_given_fields() {
        let store = store();
        let command = Command::Edit {
            id: "2".into(),
            title: None,
            description: Some("Only leads".into()),
            due: Some("2026-11-01T10:00:00Z".into()),
            completed: None,
        };
        execute(&store, command, NOW).await.expect("edit");
        let task = store.get(&TaskId::new("2")).expect("task");
        assert_eq!(task.title, "Review team performance");
        assert_eq!(task.description, "Only leads");
        assert_eq!(task.due_date, datetime!(2026-11-01 10:00 UTC));
    }

    #[tokio::test]
    async fn toggle_and_rm_unknown_ids_fail() {
        let store = store();
        let err = execute(&store, Command::Toggle { id: "99".into() }, NOW)
            .await
            .expect_err("unknown toggle");
        assert_eq!(err.to_string(), "Task not found: 99");

        let err = execute(&store, Command::Rm { id: "99".into() }, NOW)
            .await
            .expect_err("unknown rm");
        assert_eq!(err.to_string(), "Failed to delete task: Task not found: 99");
    }

    #[tokio::test]
    async fn rejects_bad_due_date() {
        let store = store();
        let command = Command::Add {
            title: "x".into(),
            description: String::new(),
            due: Some("soon".into()),
            completed: false,
        };
        assert!(execute(&store, command, NOW).await.is_err());
    }
}

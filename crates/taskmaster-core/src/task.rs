//! The task entity and the inputs used to create or edit it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::due::start_of_day;
use crate::id::TaskId;

/// A persisted task as returned by a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier assigned at creation time.
    #[serde(rename = "_id")]
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    #[serde(with = "due_date_format")]
    pub due_date: OffsetDateTime,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Set once on creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Refreshed on every mutation.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    /// The user-editable fields of this task.
    #[must_use]
    pub fn input(&self) -> TaskInput {
        TaskInput {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            completed: self.completed,
        }
    }

    /// Same fields with the completion flag flipped.
    #[must_use]
    pub fn toggled_input(&self) -> TaskInput {
        TaskInput {
            completed: !self.completed,
            ..self.input()
        }
    }
}

/// Task fields without the system-assigned id and timestamps.
///
/// This is the body of both create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Human-readable title, must not be blank.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    #[serde(with = "due_date_format")]
    pub due_date: OffsetDateTime,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl TaskInput {
    /// Build an input with an empty description that is not completed.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: OffsetDateTime) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            completed: false,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Check the constraints a task must satisfy before it is sent anywhere.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTitle`] when the title is empty or whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Form state collected by a front-end before it is turned into a [`TaskInput`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    /// Title as typed.
    pub title: String,
    /// Description as typed.
    pub description: String,
    /// Selected due date, if any.
    pub due_date: Option<OffsetDateTime>,
    /// Completion checkbox.
    pub completed: bool,
}

impl TaskDraft {
    /// Blank draft for a new task, due at the start of tomorrow.
    #[must_use]
    pub fn blank(now: OffsetDateTime) -> Self {
        Self {
            due_date: Some(start_of_day(now) + Duration::days(1)),
            ..Self::default()
        }
    }

    /// Draft prefilled from an existing task for editing.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: Some(task.due_date),
            completed: task.completed,
        }
    }

    /// Validate the draft and produce a request body.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn into_input(self) -> Result<TaskInput, ValidationError> {
        let Some(due_date) = self.due_date else {
            return Err(ValidationError::MissingDueDate);
        };
        let input = TaskInput {
            title: self.title,
            description: self.description,
            due_date,
            completed: self.completed,
        };
        input.validate()?;
        Ok(input)
    }
}

/// Rejected user input, caught before anything is dispatched to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title was empty or whitespace only.
    #[error("Task title is required")]
    EmptyTitle,
    /// No due date was chosen.
    #[error("Due date is required")]
    MissingDueDate,
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::MissingDueDate => "dueDate",
        }
    }
}

/// RFC 3339 on output. On input, also accepts a bare `YYYY-MM-DD`, read as midnight UTC.
pub mod due_date_format {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

    /// Serialize as RFC 3339.
    ///
    /// # Errors
    /// Fails if the timestamp cannot be represented in RFC 3339.
    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time::serde::rfc3339::serialize(value, serializer)
    }

    /// Deserialize from RFC 3339 or a date-only string.
    ///
    /// # Errors
    /// Fails if the string matches neither format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    /// Parse a due date the same way the deserializer does.
    ///
    /// # Errors
    /// Returns the RFC 3339 parse error when neither format matches.
    pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        let trimmed = raw.trim();
        OffsetDateTime::parse(trimmed, &Rfc3339).or_else(|err| {
            Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
                .map(|date| date.midnight().assume_utc())
                .map_err(|_| err)
        })
    }
}

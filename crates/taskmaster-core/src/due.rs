//! Derived due-date predicates. Nothing here is stored on a task.

use std::fmt;

use time::{Date, Duration, OffsetDateTime, Time, Weekday, macros::format_description};

use crate::task::Task;

/// Midnight of `now`'s calendar day, in `now`'s offset.
#[must_use]
pub fn start_of_day(now: OffsetDateTime) -> OffsetDateTime {
    now.replace_time(Time::MIDNIGHT)
}

/// Calendar day of `due` as seen from `now`'s offset.
fn local_date(due: OffsetDateTime, now: OffsetDateTime) -> Date {
    due.to_offset(now.offset()).date()
}

/// A task is overdue when it is still open and was due before today started.
///
/// Anything due today is never overdue.
#[must_use]
pub fn is_overdue(task: &Task, now: OffsetDateTime) -> bool {
    !task.completed && task.due_date < start_of_day(now)
}

/// Whether `due` falls on the same calendar day as `now`.
#[must_use]
pub fn is_due_today(due: OffsetDateTime, now: OffsetDateTime) -> bool {
    local_date(due, now) == now.date()
}

/// Human-friendly rendering of a due date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    /// Due today.
    Today,
    /// Due tomorrow.
    Tomorrow,
    /// Due later (or earlier) in the current Sunday-started week.
    Weekday(Weekday),
    /// Anything else.
    Date(Date),
}

impl DueLabel {
    /// Pick the label for `due` relative to `now`.
    #[must_use]
    pub fn for_date(due: OffsetDateTime, now: OffsetDateTime) -> Self {
        let today = now.date();
        let day = local_date(due, now);
        if day == today {
            Self::Today
        } else if today.next_day() == Some(day) {
            Self::Tomorrow
        } else if week_start(day).is_some() && week_start(day) == week_start(today) {
            Self::Weekday(day.weekday())
        } else {
            Self::Date(day)
        }
    }
}

fn week_start(day: Date) -> Option<Date> {
    day.checked_sub(Duration::days(i64::from(day.weekday().number_days_from_sunday())))
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("Today"),
            Self::Tomorrow => f.write_str("Tomorrow"),
            Self::Weekday(weekday) => weekday.fmt(f),
            Self::Date(date) => {
                let rendered = date
                    .format(format_description!("[month repr:short] [day padding:none], [year]"))
                    .map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
        }
    }
}

/// Urgency of a task, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Already done.
    Completed,
    /// Open and due before today.
    Overdue,
    /// Open and due today.
    DueToday,
    /// Open and due after today.
    Upcoming,
}

impl DueStatus {
    /// Classify a task relative to `now`.
    #[must_use]
    pub fn for_task(task: &Task, now: OffsetDateTime) -> Self {
        if task.completed {
            Self::Completed
        } else if is_overdue(task, now) {
            Self::Overdue
        } else if is_due_today(task.due_date, now) {
            Self::DueToday
        } else {
            Self::Upcoming
        }
    }

    /// Short badge text, empty for statuses that have no badge.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
            Self::DueToday | Self::Upcoming => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use time::macros::{date, datetime};

    // Thursday.
    const NOW: OffsetDateTime = datetime!(2026-10-15 14:30 UTC);

    fn task_due(due_date: OffsetDateTime, completed: bool) -> Task {
        Task {
            id: TaskId::new("t"),
            title: "t".into(),
            description: String::new(),
            due_date,
            completed,
            created_at: datetime!(2026-10-01 00:00 UTC),
            updated_at: datetime!(2026-10-01 00:00 UTC),
        }
    }

    #[test]
    fn yesterday_open_task_is_overdue() {
        assert!(is_overdue(&task_due(NOW - Duration::days(1), false), NOW));
    }

    #[test]
    fn completed_task_is_never_overdue() {
        assert!(!is_overdue(&task_due(NOW - Duration::days(5), true), NOW));
    }

    #[test]
    fn earlier_today_is_not_overdue() {
        let due = datetime!(2026-10-15 00:00 UTC);
        assert!(!is_overdue(&task_due(due, false), NOW));
        assert_eq!(DueStatus::for_task(&task_due(due, false), NOW), DueStatus::DueToday);
    }

    #[test]
    fn start_of_day_respects_offset() {
        let now = datetime!(2026-10-15 01:00 +09:00);
        assert_eq!(start_of_day(now), datetime!(2026-10-15 00:00 +09:00));
        // 2026-10-14 20:00 UTC is already 10-15 in +09:00
        assert!(!is_overdue(&task_due(datetime!(2026-10-14 20:00 UTC), false), now));
    }

    #[test]
    fn labels_relative_to_today() {
        assert_eq!(DueLabel::for_date(NOW, NOW), DueLabel::Today);
        assert_eq!(DueLabel::for_date(NOW + Duration::days(1), NOW), DueLabel::Tomorrow);
        assert_eq!(
            DueLabel::for_date(NOW + Duration::days(2), NOW),
            DueLabel::Weekday(Weekday::Saturday)
        );
        assert_eq!(
            DueLabel::for_date(NOW - Duration::days(4), NOW),
            DueLabel::Weekday(Weekday::Sunday)
        );
        assert_eq!(
            DueLabel::for_date(NOW + Duration::days(3), NOW),
            DueLabel::Date(date!(2026 - 10 - 18))
        );
    }

    #[test]
    fn label_display() {
        assert_eq!(DueLabel::Today.to_string(), "Today");
        assert_eq!(DueLabel::Weekday(Weekday::Saturday).to_string(), "Saturday");
        assert_eq!(DueLabel::Date(date!(2026 - 11 - 03)).to_string(), "Nov 3, 2026");
    }

    #[test]
    fn status_order() {
        assert_eq!(
            DueStatus::for_task(&task_due(NOW - Duration::days(1), true), NOW),
            DueStatus::Completed
        );
        assert_eq!(
            DueStatus::for_task(&task_due(NOW - Duration::days(1), false), NOW),
            DueStatus::Overdue
        );
        assert_eq!(
            DueStatus::for_task(&task_due(NOW + Duration::days(7), false), NOW),
            DueStatus::Upcoming
        );
        assert_eq!(DueStatus::Overdue.badge(), "Overdue");
        assert_eq!(DueStatus::Upcoming.badge(), "");
    }
}

//! Farm task list.
//!
//! Tasks belong to a user (keyed by email) and carry an optional due date.
//! "Today" is always passed in by the caller so overdue checks are
//! deterministic and the server can decide which timezone a farmer lives in.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Errors creating a task.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("task text must be at most {max} characters")]
    TooLong { max: usize },
}

/// A single to-do item on a farmer's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    pub user_id: String,
}

impl Task {
    /// Maximum length of a task's text, in characters.
    pub const MAX_TEXT_CHARS: usize = 500;

    /// Create an incomplete task owned by `user_id`.
    ///
    /// The id is `TASK-<unix millis>-<random suffix>`; the suffix keeps two
    /// tasks added within the same millisecond apart.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed text is empty or too long.
    pub fn new(
        text: &str,
        due_date: Option<NaiveDate>,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        if text.chars().count() > Self::MAX_TEXT_CHARS {
            return Err(TaskError::TooLong {
                max: Self::MAX_TEXT_CHARS,
            });
        }

        let suffix: u16 = rand::random();
        Ok(Self {
            id: format!("TASK-{}-{suffix:04x}", now.timestamp_millis()),
            text: text.to_owned(),
            due_date,
            is_completed: false,
            user_id: user_id.into(),
        })
    }

    /// Whether the task is past due as of `today`.
    ///
    /// A task due today is not overdue. Completed and undated tasks never are.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Flip the completion flag.
    pub const fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

fn display_order(a: &Task, b: &Task) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Sort tasks the way the list shows them.
///
/// Incomplete tasks come first. Within each group dated tasks are ordered by
/// due date and come before undated ones. The sort is stable, so undated
/// tasks keep their insertion order.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(display_order);
}

/// Dashboard widget data: how many tasks are open and which come next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub pending_count: usize,
    pub upcoming: Vec<Task>,
}

impl TaskSummary {
    /// Number of upcoming tasks shown on the dashboard.
    pub const UPCOMING_LIMIT: usize = 2;

    /// Summarize an already sorted task list.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let pending: Vec<&Task> = tasks.iter().filter(|t| !t.is_completed).collect();
        Self {
            pending_count: pending.len(),
            upcoming: pending
                .into_iter()
                .take(Self::UPCOMING_LIMIT)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(text: &str, due: Option<NaiveDate>, done: bool) -> Task {
        Task {
            id: format!("TASK-{text}"),
            text: text.to_owned(),
            due_date: due,
            is_completed: done,
            user_id: "asha@example.in".to_owned(),
        }
    }

    #[test]
    fn test_new_trims_and_rejects_empty() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let t = Task::new("  spray neem oil ", None, "asha@example.in", now).unwrap();
        assert_eq!(t.text, "spray neem oil");
        assert!(t.id.starts_with("TASK-1700000000000-"));
        assert!(!t.is_completed);

        assert_eq!(
            Task::new("   ", None, "asha@example.in", now),
            Err(TaskError::EmptyText)
        );
    }

    #[test]
    fn test_overdue_is_strictly_before_today() {
        let today = date(2024, 6, 10);
        assert!(task("a", Some(date(2024, 6, 9)), false).is_overdue(today));
        assert!(!task("b", Some(date(2024, 6, 10)), false).is_overdue(today));
        assert!(!task("c", None, false).is_overdue(today));
    }

    #[test]
    fn test_completed_task_never_overdue() {
        let today = date(2024, 6, 10);
        assert!(!task("a", Some(date(2020, 1, 1)), true).is_overdue(today));
    }

    #[test]
    fn test_sort_for_display() {
        let mut tasks = vec![
            task("done", Some(date(2024, 1, 1)), true),
            task("undated", None, false),
            task("later", Some(date(2024, 6, 20)), false),
            task("sooner", Some(date(2024, 6, 1)), false),
        ];
        sort_for_display(&mut tasks);
        let order: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(order, ["sooner", "later", "undated", "done"]);
    }

    #[test]
    fn test_summary_counts_pending_and_takes_two() {
        let tasks = vec![
            task("one", None, false),
            task("two", None, false),
            task("three", None, false),
            task("four", None, true),
        ];
        let summary = TaskSummary::from_tasks(&tasks);
        assert_eq!(summary.pending_count, 3);
        assert_eq!(summary.upcoming.len(), 2);
        assert_eq!(summary.upcoming[0].text, "one");
    }

    #[test]
    fn test_toggle() {
        let mut t = task("x", None, false);
        t.toggle();
        assert!(t.is_completed);
    }
}

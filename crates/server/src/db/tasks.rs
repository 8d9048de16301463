//! Task list storage.

use chrono::NaiveDate;
use sqlx::PgPool;

use sheti_core::Task;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    user_id: String,
    text: String,
    due_date: Option<NaiveDate>,
    is_completed: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            due_date: row.due_date,
            is_completed: row.is_completed,
            user_id: row.user_id,
        }
    }
}

/// Repository for farm tasks.
///
/// Every mutation is scoped to the owning user; another user's task id
/// behaves as if it did not exist.
pub struct TaskRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TaskRepository<'a> {
    /// Create a new task repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All tasks belonging to a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r"
            SELECT id, user_id, text, due_date, is_completed
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    /// Store a new task.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already taken.
    pub async fn insert(&self, task: &Task) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO tasks (id, user_id, text, due_date, is_completed)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.text)
        .bind(task.due_date)
        .bind(task.is_completed)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "task"))?;

        Ok(())
    }

    /// Flip a task between pending and done.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no such task.
    pub async fn toggle(&self, id: &str, user_id: &str) -> Result<Task, RepositoryError> {
        sqlx::query_as::<_, TaskRow>(
            r"
            UPDATE tasks
            SET is_completed = NOT is_completed
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, text, due_date, is_completed
            ",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .map(Task::from)
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no such task.
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

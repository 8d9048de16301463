//! Chat question log.

use sqlx::PgPool;

use super::RepositoryError;

/// Records questions asked in the chatbot by signed-in users.
pub struct QuestionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionRepository<'a> {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a question.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(&self, user_id: &str, question: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO user_questions (user_id, question_text) VALUES ($1, $2)")
            .bind(user_id)
            .bind(question)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

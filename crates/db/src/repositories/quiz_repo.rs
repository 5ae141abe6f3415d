//! Repository for the `quizzes` table.

use lms_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::quiz::{CreateQuiz, Quiz, UpdateQuiz};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, title, passing_score, questions, created_at, updated_at";

/// Provides CRUD operations for quizzes.
pub struct QuizRepo;

impl QuizRepo {
    /// Insert a new quiz, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQuiz) -> Result<Quiz, sqlx::Error> {
        let query = format!(
            "INSERT INTO quizzes (course_id, title, passing_score, questions)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(input.passing_score)
            .bind(Json(&input.questions))
            .fetch_one(pool)
            .await
    }

    /// Find a quiz by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a course's quizzes in creation order.
    pub async fn list_by_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Quiz>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM quizzes WHERE course_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Update a quiz. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuiz,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!(
            "UPDATE quizzes SET
                title = COALESCE($2, title),
                passing_score = COALESCE($3, passing_score),
                questions = COALESCE($4, questions)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.passing_score)
            .bind(input.questions.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a quiz. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

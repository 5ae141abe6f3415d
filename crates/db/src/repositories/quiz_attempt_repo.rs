//! Repository for the append-only `quiz_attempts` table.
//!
//! There is no update or delete here: the log is the full
//! attempt history. A quiz with recorded attempts keeps its questions and
//! cannot be deleted through the API.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::quiz::{CreateQuizAttempt, QuizAttempt};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, quiz_id, user_id, answers, correct_count, question_count, \
                       score, passed, attempted_at";

/// Provides append and read access to quiz attempts.
pub struct QuizAttemptRepo;

impl QuizAttemptRepo {
    /// Append a graded attempt.
    pub async fn append(
        pool: &PgPool,
        input: &CreateQuizAttempt,
    ) -> Result<QuizAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_attempts
                (quiz_id, user_id, answers, correct_count, question_count, score, passed)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(input.quiz_id)
            .bind(input.user_id)
            .bind(&input.answers)
            .bind(input.result.correct_count)
            .bind(input.result.question_count)
            .bind(input.result.score)
            .bind(input.result.passed)
            .fetch_one(pool)
            .await
    }

    /// A user's attempts on a quiz, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        quiz_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_attempts
             WHERE quiz_id = $1 AND user_id = $2
             ORDER BY attempted_at, id"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every attempt on a quiz, oldest first.
    pub async fn list_for_quiz(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_attempts WHERE quiz_id = $1 ORDER BY attempted_at, id"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any attempt has been recorded against the quiz.
    pub async fn exists_for_quiz(pool: &PgPool, quiz_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM quiz_attempts WHERE quiz_id = $1)",
        )
        .bind(quiz_id)
        .fetch_one(pool)
        .await
    }
}

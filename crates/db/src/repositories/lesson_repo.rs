//! Repository for the `lessons` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::lesson::{CreateLesson, Lesson, UpdateLesson};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, title, content, position, created_at, updated_at";

/// Provides CRUD operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson into a course.
    ///
    /// Without an explicit `position` the lesson is appended after the
    /// current last lesson.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        input: &CreateLesson,
    ) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (course_id, title, content, position)
             VALUES ($1, $2, $3, COALESCE($4,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM lessons WHERE course_id = $1)))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(course_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.position)
            .fetch_one(pool)
            .await
    }

    /// The course's lesson sequence.
    pub async fn list_by_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE course_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Update a lesson. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the lesson does not exist in the given course.
    pub async fn update(
        pool: &PgPool,
        course_id: DbId,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                position = COALESCE($5, position)
             WHERE id = $1 AND course_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(course_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a lesson. Returns `true` if a row was removed.
    ///
    /// Progress entries for the lesson are removed by cascade. Enrollments
    /// that already completed keep their status.
    pub async fn delete(pool: &PgPool, course_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1 AND course_id = $2")
            .bind(id)
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

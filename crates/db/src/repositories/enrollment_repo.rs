//! Repository for the `enrollments` and `enrollment_lessons` tables.
//!
//! Enrollment uniqueness per (user, course) is the `uq_enrollments_user_course`
//! constraint; callers translate its violation into a domain error. Lesson
//! completion runs in a transaction holding a row lock on the enrollment so
//! concurrent completions of the last two lessons cannot both miss the
//! status flip.

use chrono::{SubsecRound, Utc};
use lms_core::enrollment::{
    evaluate_status, mark_lesson, summarize, LessonMark, LessonProgress, StatusTransition,
};
use lms_core::types::DbId;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::enrollment::{
    CreateEnrollment, Enrollment, EnrollmentDetail, EnrollmentLessonRow,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, course_id, status, enrolled_at, completed_at, created_at, updated_at";

/// Name of the unique constraint guarding one enrollment per (user, course).
pub const UQ_USER_COURSE: &str = "uq_enrollments_user_course";

/// Outcome of [`EnrollmentRepo::mark_lesson_complete`].
#[derive(Debug)]
pub enum LessonCompletion {
    EnrollmentNotFound,
    LessonNotInCourse,
    Applied {
        detail: EnrollmentDetail,
        mark: LessonMark,
        transition: StatusTransition,
    },
}

/// Provides the enrollment ledger operations.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert a new in-progress enrollment with `enrolled_at = NOW()`.
    ///
    /// A second enrollment for the same pair fails with a
    /// [`UQ_USER_COURSE`] unique violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEnrollment,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(input.user_id)
            .bind(input.course_id)
            .fetch_one(pool)
            .await
    }

    /// Find an enrollment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the enrollment binding `user_id` to `course_id`, if any.
    pub async fn find_by_user_and_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's enrollments, most recent first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 ORDER BY enrolled_at DESC, id DESC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every enrollment in a course, oldest first.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE course_id = $1 ORDER BY enrolled_at, id"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Progress entries of an enrollment in the order they were recorded.
    pub async fn progress(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Vec<LessonProgress>, sqlx::Error> {
        load_progress(pool, enrollment_id).await
    }

    /// Build the detail view (progress entries plus summary) for `enrollment`.
    pub async fn detail(
        pool: &PgPool,
        enrollment: Enrollment,
    ) -> Result<EnrollmentDetail, sqlx::Error> {
        let lesson_ids = load_lesson_ids(pool, enrollment.course_id).await?;
        let progress = load_progress(pool, enrollment.id).await?;
        let summary = summarize(&lesson_ids, &progress);
        Ok(EnrollmentDetail {
            enrollment,
            progress,
            summary,
        })
    }

    /// Mark `lesson_id` completed for the enrollment and recompute its status.
    ///
    /// Re-marking a completed lesson writes nothing. When every lesson of the
    /// course has a completed entry and the enrollment is still in progress,
    /// the status flips to `completed` and `completed_at` is set; a completed
    /// enrollment is never touched again.
    pub async fn mark_lesson_complete(
        pool: &PgPool,
        enrollment_id: DbId,
        lesson_id: DbId,
    ) -> Result<LessonCompletion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE");
        let Some(mut enrollment) = sqlx::query_as::<_, Enrollment>(&query)
            .bind(enrollment_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(LessonCompletion::EnrollmentNotFound);
        };

        let lesson_ids = load_lesson_ids(&mut *tx, enrollment.course_id).await?;
        if !lesson_ids.contains(&lesson_id) {
            return Ok(LessonCompletion::LessonNotInCourse);
        }

        let mut progress = load_progress(&mut *tx, enrollment_id).await?;
        // Postgres keeps microseconds; truncate so in-memory and stored values agree.
        let now = Utc::now().trunc_subsecs(6);

        let mark = mark_lesson(&mut progress, lesson_id, now);
        if mark == LessonMark::Recorded {
            sqlx::query(
                "INSERT INTO enrollment_lessons (enrollment_id, lesson_id, completed, completed_at)
                 VALUES ($1, $2, true, $3)
                 ON CONFLICT (enrollment_id, lesson_id) DO UPDATE
                    SET completed = true, completed_at = EXCLUDED.completed_at
                    WHERE enrollment_lessons.completed = false",
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let transition = evaluate_status(enrollment.status(), &lesson_ids, &progress, now);
        if let StatusTransition::Completed { at } = transition {
            let query = format!(
                "UPDATE enrollments SET status = 'completed', completed_at = $2
                 WHERE id = $1 AND status = 'in-progress'
                 RETURNING {COLUMNS}"
            );
            enrollment = sqlx::query_as::<_, Enrollment>(&query)
                .bind(enrollment_id)
                .bind(at)
                .fetch_one(&mut *tx)
                .await?;
            tracing::info!(
                enrollment_id,
                user_id = enrollment.user_id,
                course_id = enrollment.course_id,
                "Enrollment completed"
            );
        }

        tx.commit().await?;

        let summary = summarize(&lesson_ids, &progress);
        Ok(LessonCompletion::Applied {
            detail: EnrollmentDetail {
                enrollment,
                progress,
                summary,
            },
            mark,
            transition,
        })
    }
}

/// Lesson IDs of a course in sequence order.
async fn load_lesson_ids<'e, E: PgExecutor<'e>>(
    executor: E,
    course_id: DbId,
) -> Result<Vec<DbId>, sqlx::Error> {
    sqlx::query_scalar::<_, DbId>("SELECT id FROM lessons WHERE course_id = $1 ORDER BY position, id")
        .bind(course_id)
        .fetch_all(executor)
        .await
}

async fn load_progress<'e, E: PgExecutor<'e>>(
    executor: E,
    enrollment_id: DbId,
) -> Result<Vec<LessonProgress>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EnrollmentLessonRow>(
        "SELECT lesson_id, completed, completed_at FROM enrollment_lessons
         WHERE enrollment_id = $1 ORDER BY id",
    )
    .bind(enrollment_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(LessonProgress::from).collect())
}

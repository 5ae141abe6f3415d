//! Enrollment entity model, lesson-progress rows, and the detail view.

use lms_core::enrollment::{EnrollmentStatus, LessonProgress, ProgressSummary};
use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An enrollment row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    /// `in-progress` or `completed`.
    pub status: String,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Enrollment {
    /// Parsed status. Rows violating the check constraint read as in-progress.
    pub fn status(&self) -> EnrollmentStatus {
        self.status.parse().unwrap_or(EnrollmentStatus::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        self.status() == EnrollmentStatus::Completed
    }
}

/// A row from `enrollment_lessons`.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentLessonRow {
    pub lesson_id: DbId,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
}

impl From<EnrollmentLessonRow> for LessonProgress {
    fn from(row: EnrollmentLessonRow) -> Self {
        LessonProgress {
            lesson_id: row.lesson_id,
            completed: row.completed,
            completed_at: row.completed_at,
        }
    }
}

/// An enrollment with its progress entries and aggregate numbers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub progress: Vec<LessonProgress>,
    pub summary: ProgressSummary,
}

/// DTO for creating a new enrollment.
#[derive(Debug, Clone)]
pub struct CreateEnrollment {
    pub user_id: DbId,
    pub course_id: DbId,
}

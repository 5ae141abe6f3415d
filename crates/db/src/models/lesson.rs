//! Lesson entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A lesson row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new lesson.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    pub title: String,
    pub content: Option<String>,
    /// Appended after the current last lesson if omitted.
    pub position: Option<i32>,
}

/// DTO for updating an existing lesson. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub content: Option<String>,
    pub position: Option<i32>,
}

//! Handlers for lessons nested under `/courses/{id}/lessons`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use lms_db::repositories::LessonRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::course::{find_editable_course, find_visible_course};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /courses/{id}/lessons`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub content: Option<String>,
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
}

/// Request body for `PUT /courses/{id}/lessons/{lesson_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
}

/// GET /api/v1/courses/{id}/lessons
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Lesson>>>> {
    find_visible_course(&state, &user, course_id).await?;
    let lessons = LessonRepo::list_by_course(&state.pool, course_id).await?;
    Ok(Json(DataResponse { data: lessons }))
}

/// POST /api/v1/courses/{id}/lessons
///
/// Appends to the end of the lesson sequence unless a position is given.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<DbId>,
    Json(input): Json<CreateLessonRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Lesson>>)> {
    input.validate()?;
    find_editable_course(&state, &user, course_id).await?;

    let lesson = LessonRepo::create(
        &state.pool,
        course_id,
        &CreateLesson {
            title: input.title.trim().to_string(),
            content: input.content,
            position: input.position,
        },
    )
    .await?;

    tracing::info!(course_id, lesson_id = lesson.id, "Lesson added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// PUT /api/v1/courses/{id}/lessons/{lesson_id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, lesson_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateLessonRequest>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    input.validate()?;
    find_editable_course(&state, &user, course_id).await?;

    let update_dto = UpdateLesson {
        title: input.title.map(|t| t.trim().to_string()),
        content: input.content,
        position: input.position,
    };
    let lesson = LessonRepo::update(&state.pool, course_id, lesson_id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        }))?;
    Ok(Json(DataResponse { data: lesson }))
}

/// DELETE /api/v1/courses/{id}/lessons/{lesson_id}
///
/// Progress entries for the lesson go with it. Enrollments that already
/// completed the course stay completed.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((course_id, lesson_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_editable_course(&state, &user, course_id).await?;

    let deleted = LessonRepo::delete(&state.pool, course_id, lesson_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        }))
    }
}

//! Handlers for the `/courses` resource.
//!
//! Trainers and admins create courses; only the owning trainer or an admin
//! may change one. Learners only ever see published courses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::roles::Role;
use lms_core::types::DbId;
use lms_db::models::course::{Course, CourseDetail, CreateCourse, UpdateCourse};
use lms_db::repositories::{CourseRepo, LessonRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireTrainer};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /courses`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    pub is_published: Option<bool>,
    /// Owning trainer. Only admins may assign a course to someone else.
    pub trainer_id: Option<DbId>,
}

/// Request body for `PUT /courses/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    pub is_published: Option<bool>,
}

/// POST /api/v1/courses
pub async fn create(
    State(state): State<AppState>,
    RequireTrainer(user): RequireTrainer,
    Json(input): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    input.validate()?;

    let trainer_id = match input.trainer_id {
        Some(id) if id != user.user_id => {
            if !user.role.is_admin() {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins may assign a course to another trainer".into(),
                )));
            }
            ensure_can_own_courses(&state, id).await?;
            id
        }
        _ => user.user_id,
    };

    let course = CourseRepo::create(
        &state.pool,
        &CreateCourse {
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category,
            is_published: input.is_published,
            trainer_id,
        },
    )
    .await?;

    tracing::info!(course_id = course.id, trainer_id, "Course created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// GET /api/v1/courses
///
/// Published courses for learners; drafts too for course authors.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list(&state.pool, user.role.can_author_courses()).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CourseDetail>>> {
    let course = find_visible_course(&state, &user, id).await?;
    let lessons = LessonRepo::list_by_course(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CourseDetail { course, lessons },
    }))
}

/// PUT /api/v1/courses/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourseRequest>,
) -> AppResult<Json<DataResponse<Course>>> {
    input.validate()?;
    find_editable_course(&state, &user, id).await?;

    let update_dto = UpdateCourse {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description,
        category: input.category,
        is_published: input.is_published,
    };
    let course = CourseRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;
    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/courses/{id}
///
/// Soft delete. Existing enrollments and certificates are kept.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_editable_course(&state, &user, id).await?;

    let deleted = CourseRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(course_id = id, user_id = user.user_id, "Course deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

/// Load a live course or fail with `NotFound`.
pub(crate) async fn find_course(state: &AppState, id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))
}

/// Load a course the caller may see. Drafts are hidden from non-editors.
pub(crate) async fn find_visible_course(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Course> {
    let course = find_course(state, id).await?;
    if !course.is_published && !user.role.can_author_courses() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }));
    }
    Ok(course)
}

/// Load a course the caller may edit (owning trainer or admin).
pub(crate) async fn find_editable_course(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Course> {
    let course = find_course(state, id).await?;
    if !user.can_edit_course(course.trainer_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the course trainer or an admin may modify this course".into(),
        )));
    }
    Ok(course)
}

async fn ensure_can_own_courses(state: &AppState, user_id: DbId) -> AppResult<()> {
    let owner = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    let role: Role = owner
        .role
        .parse()
        .map_err(|e: String| AppError::InternalError(format!("Stored role is invalid: {e}")))?;
    if !owner.is_active || !role.can_author_courses() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {user_id} cannot own courses"
        ))));
    }
    Ok(())
}

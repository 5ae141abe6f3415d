//! Handlers for the enrollment ledger.
//!
//! Enrolling lives under `/courses/{id}/enroll`; everything else under
//! `/enrollments`. Only the enrolled learner may record progress on their
//! own enrollment. Course editors may read the enrollments of their course.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::enrollment::{CreateEnrollment, Enrollment, EnrollmentDetail};
use lms_db::repositories::enrollment_repo::{LessonCompletion, UQ_USER_COURSE};
use lms_db::repositories::{CourseRepo, EnrollmentRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::course::{find_course, find_editable_course, find_visible_course};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/courses/{id}/enroll
///
/// Enroll the caller. A second enrollment for the same course fails with
/// `DUPLICATE_ENROLLMENT`, also when two requests race.
pub async fn enroll(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<EnrollmentDetail>>)> {
    let course = find_visible_course(&state, &user, course_id).await?;
    if !course.is_published {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot enroll in an unpublished course".into(),
        )));
    }

    let input = CreateEnrollment {
        user_id: user.user_id,
        course_id,
    };
    let enrollment = EnrollmentRepo::create(&state.pool, &input)
        .await
        .map_err(|err| {
            if lms_db::is_unique_violation(&err, UQ_USER_COURSE) {
                AppError::Core(CoreError::DuplicateEnrollment {
                    user_id: input.user_id,
                    course_id,
                })
            } else {
                AppError::Database(err)
            }
        })?;

    tracing::info!(
        enrollment_id = enrollment.id,
        user_id = user.user_id,
        course_id,
        "User enrolled"
    );

    let detail = EnrollmentRepo::detail(&state.pool, enrollment).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/courses/{id}/enrollments
pub async fn list_for_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentDetail>>>> {
    find_editable_course(&state, &user, course_id).await?;
    let enrollments = EnrollmentRepo::list_by_course(&state.pool, course_id).await?;
    let details = with_details(&state, enrollments).await?;
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/enrollments
///
/// The caller's own enrollments, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<EnrollmentDetail>>>> {
    let enrollments = EnrollmentRepo::list_by_user(&state.pool, user.user_id).await?;
    let details = with_details(&state, enrollments).await?;
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/enrollments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EnrollmentDetail>>> {
    let enrollment = find_enrollment(&state, id).await?;
    ensure_can_view(&state, &user, &enrollment).await?;
    let detail = EnrollmentRepo::detail(&state.pool, enrollment).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/enrollments/{id}/lessons/{lesson_id}/complete
///
/// Idempotent. Returns the updated enrollment; the status flips to
/// `completed` once every lesson of the course is done.
pub async fn complete_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, lesson_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<EnrollmentDetail>>> {
    let enrollment = find_enrollment(&state, id).await?;
    ensure_owner(&user, &enrollment)?;
    find_course(&state, enrollment.course_id).await?;

    match EnrollmentRepo::mark_lesson_complete(&state.pool, id, lesson_id).await? {
        LessonCompletion::EnrollmentNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id,
        })),
        LessonCompletion::LessonNotInCourse => Err(AppError::Core(CoreError::Validation(
            format!(
                "Lesson {lesson_id} does not belong to course {}",
                enrollment.course_id
            ),
        ))),
        LessonCompletion::Applied {
            detail,
            mark,
            transition,
        } => {
            tracing::debug!(
                enrollment_id = id,
                lesson_id,
                ?mark,
                ?transition,
                "Lesson completion applied"
            );
            Ok(Json(DataResponse { data: detail }))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_enrollment(state: &AppState, id: DbId) -> AppResult<Enrollment> {
    EnrollmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id,
        }))
}

/// Only the enrolled user may act on an enrollment.
pub(crate) fn ensure_owner(user: &AuthUser, enrollment: &Enrollment) -> AppResult<()> {
    if enrollment.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the enrolled user may do this".into(),
        )));
    }
    Ok(())
}

/// The enrolled user, an admin, or the course's trainer may read an enrollment.
///
/// Read access survives a soft delete of the course, for the trainer as for
/// admins.
async fn ensure_can_view(
    state: &AppState,
    user: &AuthUser,
    enrollment: &Enrollment,
) -> AppResult<()> {
    if enrollment.user_id == user.user_id || user.role.is_admin() {
        return Ok(());
    }
    let owner_id = CourseRepo::find_trainer_id(&state.pool, enrollment.course_id).await?;
    match owner_id {
        Some(owner_id) if user.can_edit_course(owner_id) => Ok(()),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "You may not view this enrollment".into(),
        ))),
    }
}

async fn with_details(
    state: &AppState,
    enrollments: Vec<Enrollment>,
) -> AppResult<Vec<EnrollmentDetail>> {
    let mut details = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        details.push(EnrollmentRepo::detail(&state.pool, enrollment).await?);
    }
    Ok(details)
}

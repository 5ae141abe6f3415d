//! Handlers for quizzes and the append-only quiz attempt log.
//!
//! Course editors see quizzes with their answer keys; everyone else gets the
//! public view. Attempts require an enrollment in the quiz's course.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::quiz::{
    score_attempt, validate_passing_score, validate_questions, QuizQuestion, DEFAULT_PASSING_SCORE,
};
use lms_core::types::DbId;
use lms_db::models::course::Course;
use lms_db::models::quiz::{
    CreateQuiz, CreateQuizAttempt, PublicQuiz, Quiz, QuizAttempt, UpdateQuiz,
};
use lms_db::repositories::{EnrollmentRepo, QuizAttemptRepo, QuizRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::course::{find_course, find_editable_course, find_visible_course};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /courses/{id}/quizzes`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Percentage needed to pass. Defaults to [`DEFAULT_PASSING_SCORE`].
    pub passing_score: Option<i32>,
    pub questions: Vec<QuizQuestion>,
}

/// Request body for `PUT /quizzes/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub passing_score: Option<i32>,
    pub questions: Option<Vec<QuizQuestion>>,
}

/// Request body for `POST /quizzes/{id}/attempts`.
#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    /// Chosen option index per question, in question order.
    pub answers: Vec<i32>,
}

/// A quiz as the caller is allowed to see it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QuizView {
    Full(Quiz),
    Public(PublicQuiz),
}

impl QuizView {
    fn for_user(quiz: Quiz, user: &AuthUser, course: &Course) -> Self {
        if user.can_edit_course(course.trainer_id) {
            QuizView::Full(quiz)
        } else {
            QuizView::Public(PublicQuiz::from(&quiz))
        }
    }
}

/// GET /api/v1/courses/{id}/quizzes
pub async fn list_for_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<QuizView>>>> {
    let course = find_visible_course(&state, &user, course_id).await?;
    let quizzes = QuizRepo::list_by_course(&state.pool, course_id).await?;
    let views = quizzes
        .into_iter()
        .map(|q| QuizView::for_user(q, &user, &course))
        .collect();
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/courses/{id}/quizzes
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<DbId>,
    Json(input): Json<CreateQuizRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Quiz>>)> {
    input.validate()?;
    let passing_score = input.passing_score.unwrap_or(DEFAULT_PASSING_SCORE);
    validate_passing_score(passing_score)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_questions(&input.questions)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    find_editable_course(&state, &user, course_id).await?;

    let quiz = QuizRepo::create(
        &state.pool,
        &CreateQuiz {
            course_id,
            title: input.title.trim().to_string(),
            passing_score,
            questions: input.questions,
        },
    )
    .await?;

    tracing::info!(quiz_id = quiz.id, course_id, "Quiz created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: quiz })))
}

/// GET /api/v1/quizzes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuizView>>> {
    let quiz = find_quiz(&state, id).await?;
    let course = find_visible_course(&state, &user, quiz.course_id).await?;
    Ok(Json(DataResponse {
        data: QuizView::for_user(quiz, &user, &course),
    }))
}

/// PUT /api/v1/quizzes/{id}
///
/// Questions are frozen once any attempt has been recorded; title and
/// passing score may still change.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuizRequest>,
) -> AppResult<Json<DataResponse<Quiz>>> {
    input.validate()?;
    if let Some(score) = input.passing_score {
        validate_passing_score(score).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(questions) = &input.questions {
        validate_questions(questions).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let quiz = find_quiz(&state, id).await?;
    find_editable_course(&state, &user, quiz.course_id).await?;

    if input.questions.is_some() && QuizAttemptRepo::exists_for_quiz(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Questions cannot change once attempts have been recorded".into(),
        )));
    }

    let update_dto = UpdateQuiz {
        title: input.title.map(|t| t.trim().to_string()),
        passing_score: input.passing_score,
        questions: input.questions,
    };
    let quiz = QuizRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;
    Ok(Json(DataResponse { data: quiz }))
}

/// DELETE /api/v1/quizzes/{id}
///
/// Refused with 409 once the quiz has recorded attempts.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let quiz = find_quiz(&state, id).await?;
    find_editable_course(&state, &user, quiz.course_id).await?;

    if QuizAttemptRepo::exists_for_quiz(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A quiz with recorded attempts cannot be deleted".into(),
        )));
    }

    if QuizRepo::delete(&state.pool, id).await? {
        tracing::info!(quiz_id = id, course_id = quiz.course_id, "Quiz deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Quiz", id }))
    }
}

/// POST /api/v1/quizzes/{id}/attempts
///
/// Grade and record an attempt. Earlier attempts are never touched.
pub async fn submit_attempt(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitAttemptRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QuizAttempt>>)> {
    let quiz = find_quiz(&state, id).await?;
    find_course(&state, quiz.course_id).await?;

    let enrolled =
        EnrollmentRepo::find_by_user_and_course(&state.pool, user.user_id, quiz.course_id)
            .await?
            .is_some();
    if !enrolled {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only learners enrolled in the course may attempt its quizzes".into(),
        )));
    }

    let result = score_attempt(&quiz.questions.0, quiz.passing_score, &input.answers)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let attempt = QuizAttemptRepo::append(
        &state.pool,
        &CreateQuizAttempt {
            quiz_id: id,
            user_id: user.user_id,
            answers: input.answers,
            result,
        },
    )
    .await?;

    tracing::info!(
        attempt_id = attempt.id,
        quiz_id = id,
        user_id = user.user_id,
        score = attempt.score,
        passed = attempt.passed,
        "Quiz attempt recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: attempt })))
}

/// GET /api/v1/quizzes/{id}/attempts
///
/// The caller's own attempts, or every attempt for course editors.
pub async fn list_attempts(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<QuizAttempt>>>> {
    let quiz = find_quiz(&state, id).await?;
    let course = find_visible_course(&state, &user, quiz.course_id).await?;

    let attempts = if user.can_edit_course(course.trainer_id) {
        QuizAttemptRepo::list_for_quiz(&state.pool, id).await?
    } else {
        QuizAttemptRepo::list_for_user(&state.pool, id, user.user_id).await?
    };
    Ok(Json(DataResponse { data: attempts }))
}

async fn find_quiz(state: &AppState, id: DbId) -> AppResult<Quiz> {
    QuizRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quiz", id }))
}

//! Route definitions for the `/courses` resource and its nested resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{course, enrollment, lesson, quiz};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                             -> course::list
/// POST   /                             -> course::create
/// GET    /{id}                         -> course::get_by_id
/// PUT    /{id}                         -> course::update
/// DELETE /{id}                         -> course::delete
/// GET    /{id}/lessons                 -> lesson::list
/// POST   /{id}/lessons                 -> lesson::create
/// PUT    /{id}/lessons/{lesson_id}     -> lesson::update
/// DELETE /{id}/lessons/{lesson_id}     -> lesson::delete
/// GET    /{id}/quizzes                 -> quiz::list_for_course
/// POST   /{id}/quizzes                 -> quiz::create
/// POST   /{id}/enroll                  -> enrollment::enroll
/// GET    /{id}/enrollments             -> enrollment::list_for_course
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course::list).post(course::create))
        .route(
            "/{id}",
            get(course::get_by_id)
                .put(course::update)
                .delete(course::delete),
        )
        .route("/{id}/lessons", get(lesson::list).post(lesson::create))
        .route(
            "/{id}/lessons/{lesson_id}",
            put(lesson::update).delete(lesson::delete),
        )
        .route(
            "/{id}/quizzes",
            get(quiz::list_for_course).post(quiz::create),
        )
        .route("/{id}/enroll", post(enrollment::enroll))
        .route("/{id}/enrollments", get(enrollment::list_for_course))
}

//! Route definitions for the `/quizzes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::quiz;
use crate::state::AppState;

/// Routes mounted at `/quizzes`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/attempts   -> submit_attempt
/// GET    /{id}/attempts   -> list_attempts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(quiz::get_by_id).put(quiz::update).delete(quiz::delete),
        )
        .route(
            "/{id}/attempts",
            get(quiz::list_attempts).post(quiz::submit_attempt),
        )
}

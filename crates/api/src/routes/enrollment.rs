//! Route definitions for the `/enrollments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{certificate, enrollment};
use crate::state::AppState;

/// Routes mounted at `/enrollments`.
///
/// ```text
/// GET  /                                     -> enrollment::list_mine
/// GET  /{id}                                 -> enrollment::get_by_id
/// POST /{id}/lessons/{lesson_id}/complete    -> enrollment::complete_lesson
/// POST /{id}/certificate                     -> certificate::issue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(enrollment::list_mine))
        .route("/{id}", get(enrollment::get_by_id))
        .route(
            "/{id}/lessons/{lesson_id}/complete",
            post(enrollment::complete_lesson),
        )
        .route("/{id}/certificate", post(certificate::issue))
}

//! Route definitions for the `/certificates` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::certificate;
use crate::state::AppState;

/// Routes mounted at `/certificates`.
///
/// ```text
/// GET /                  -> list_mine
/// GET /{id}              -> get_by_id
/// GET /verify/{number}   -> verify (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(certificate::list_mine))
        .route("/{id}", get(certificate::get_by_id))
        .route("/verify/{number}", get(certificate::verify))
}

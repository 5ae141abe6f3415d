pub mod admin;
pub mod auth;
pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod health;
pub mod quiz;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   signup as learner (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current profile
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, deactivate
///
/// /courses                                         list, create (trainer+)
/// /courses/{id}                                    get, update, delete (owner / admin)
/// /courses/{id}/lessons                            list, add
/// /courses/{id}/lessons/{lesson_id}                update, delete
/// /courses/{id}/quizzes                            list, create
/// /courses/{id}/enroll                             enroll self (POST)
/// /courses/{id}/enrollments                        course roster (owner / admin)
///
/// /enrollments                                     my enrollments
/// /enrollments/{id}                                detail with progress
/// /enrollments/{id}/lessons/{lesson_id}/complete   mark lesson complete (POST)
/// /enrollments/{id}/certificate                    issue certificate (POST)
///
/// /quizzes/{id}                                    get (answer key for editors), update, delete
/// /quizzes/{id}/attempts                           submit (POST), history (GET)
///
/// /certificates                                    my certificates
/// /certificates/{id}                               get (owner / admin)
/// /certificates/verify/{number}                    public verification
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/courses", course::router())
        .nest("/enrollments", enrollment::router())
        .nest("/quizzes", quiz::router())
        .nest("/certificates", certificate::router())
}

//! HTTP-level integration tests for the auth and admin user endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_auth, post_json, post_json_auth, put_json_auth,
    user_with_token, TEST_PASSWORD,
};
use lms_core::roles::Role;
use lms_db::repositories::UserRepo;
use sqlx::PgPool;

async fn login(app: axum::Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_creates_learner(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "name": "Alice",
        "email": "Alice@Example.com",
        "password": "password123"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
    assert_eq!(json["user"]["role"], "learner");
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert!(json["user"].get("passwordHash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "name": "Alice",
        "email": "alice@example.com",
        "password": "password123"
    });

    let first = post_json(app.clone(), "/api/v1/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut upper = body;
    upper["email"] = serde_json::json!("ALICE@example.com");
    let second = post_json(app, "/api/v1/auth/register", upper).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_short_password_and_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let short = serde_json::json!({ "name": "Bob", "email": "bob@example.com", "password": "short" });
    let response = post_json(app.clone(), "/api/v1/auth/register", short).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let bad_email = serde_json::json!({ "name": "Bob", "email": "bob", "password": "password123" });
    let response = post_json(app, "/api/v1/auth/register", bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success_and_wrong_password(pool: PgPool) {
    let (user, _) = user_with_token(&pool, "trainer1", Role::Trainer).await;
    let app = common::build_test_app(pool);

    let json = login(app.clone(), "trainer1@test.local", TEST_PASSWORD).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "trainer");
    assert!(json["expiresIn"].is_number());

    let body = serde_json::json!({ "email": "trainer1@test.local", "password": "wrong-password" });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "email": "ghost@test.local", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_deactivated_user_forbidden(pool: PgPool) {
    let (user, _) = user_with_token(&pool, "gone", Role::Learner).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "gone@test.local", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    user_with_token(&pool, "rotator", Role::Learner).await;
    let app = common::build_test_app(pool);

    let json = login(app.clone(), "rotator@test.local", TEST_PASSWORD).await;
    let refresh_token = json["refreshToken"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refreshToken": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refreshToken"], refresh_token);

    let reused = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    user_with_token(&pool, "leaver", Role::Learner).await;
    let app = common::build_test_app(pool);

    let json = login(app.clone(), "leaver@test.local", TEST_PASSWORD).await;
    let access = json["accessToken"].as_str().unwrap();
    let refresh = json["refreshToken"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refreshToken": refresh });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_token(pool: PgPool) {
    let (user, token) = user_with_token(&pool, "me", Role::Learner).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], user.id);
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_learner_cannot_list_users(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "nosy", Role::Learner).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_superadmin_grants_admin(pool: PgPool) {
    let (_, admin_token) = user_with_token(&pool, "admin", Role::Admin).await;
    let (_, super_token) = user_with_token(&pool, "root", Role::Superadmin).await;
    let app = common::build_test_app(pool);

    let trainer = serde_json::json!({
        "name": "New Trainer",
        "email": "newtrainer@test.local",
        "password": "password123",
        "role": "trainer"
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", trainer, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "trainer");

    let admin = serde_json::json!({
        "name": "New Admin",
        "email": "newadmin@test.local",
        "password": "password123",
        "role": "admin"
    });
    let response =
        post_json_auth(app.clone(), "/api/v1/admin/users", admin.clone(), &admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app, "/api/v1/admin/users", admin, &super_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_updates_and_deactivates_user(pool: PgPool) {
    let (_, admin_token) = user_with_token(&pool, "admin", Role::Admin).await;
    let (learner, _) = user_with_token(&pool, "learner", Role::Learner).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/admin/users/{}", learner.id);
    let response = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "role": "trainer" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "trainer");

    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &admin_token).await;
    assert_eq!(body_json(response).await["data"]["isActive"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_cannot_touch_superadmin(pool: PgPool) {
    let (_, admin_token) = user_with_token(&pool, "admin", Role::Admin).await;
    let (root, _) = user_with_token(&pool, "root", Role::Superadmin).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/admin/users/{}", root.id);
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_check(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

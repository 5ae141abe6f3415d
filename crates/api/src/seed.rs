//! Development seed: replace every user with the fixed demo accounts.

use lms_core::seed::{DEMO_ACCOUNTS, DEMO_PASSWORD};
use lms_db::models::user::{CreateUser, User};
use lms_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Wipe the `users` table (and everything referencing it) and insert one
/// demo account per role, all with [`DEMO_PASSWORD`].
pub async fn seed_demo_accounts(pool: &PgPool) -> AppResult<Vec<User>> {
    let password_hash = hash_password(DEMO_PASSWORD)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let accounts: Vec<CreateUser> = DEMO_ACCOUNTS
        .iter()
        .map(|account| CreateUser {
            name: account.name.to_string(),
            email: account.email.to_string(),
            password_hash: password_hash.clone(),
            role: account.role.as_str().to_string(),
        })
        .collect();

    let users = UserRepo::replace_all(pool, &accounts).await?;
    for user in &users {
        tracing::info!(user_id = user.id, email = %user.email, role = %user.role, "Seeded account");
    }
    Ok(users)
}

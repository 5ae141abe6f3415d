//! Development seed: wipe the `users` table and insert one demo account per
//! role, all sharing the same placeholder password.
//!
//! Every table that references users is emptied along with it.

use anyhow::Context;
use lms_api::seed::seed_demo_accounts;
use lms_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("lms_seed=info,lms_api=info,lms_db=info");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = lms_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    lms_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let users = seed_demo_accounts(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Seeding failed: {e}"))?;

    tracing::info!(count = users.len(), "Seed complete");
    Ok(())
}

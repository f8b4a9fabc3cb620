//! Seed the users table with bootstrap ops/admin accounts.
//!
//! Reads `SEED_ADMIN_EMAIL`/`SEED_ADMIN_PASSWORD` and
//! `SEED_OPS_EMAIL`/`SEED_OPS_PASSWORD` from the environment and creates
//! each account unless its email already exists. Run once per environment:
//!
//! ```text
//! cargo run --bin relieftrack-seed
//! ```

use anyhow::{bail, Context};

use relieftrack_api::auth::password::{hash_password, validate_password_strength};
use relieftrack_core::roles::{ROLE_ADMIN, ROLE_OPS};
use relieftrack_core::validation::normalize_email;
use relieftrack_db::models::user::CreateUser;
use relieftrack_db::repositories::UserRepo;
use relieftrack_db::DbPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = relieftrack_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    relieftrack_db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    seed_user(&pool, "Admin User", "SEED_ADMIN_EMAIL", "SEED_ADMIN_PASSWORD", ROLE_ADMIN).await?;
    seed_user(&pool, "Operations Team", "SEED_OPS_EMAIL", "SEED_OPS_PASSWORD", ROLE_OPS).await?;

    Ok(())
}

/// Create one account from its env-var pair, skipping if it already exists.
async fn seed_user(
    pool: &DbPool,
    name: &str,
    email_var: &str,
    password_var: &str,
    role: &str,
) -> anyhow::Result<()> {
    let Ok(email) = std::env::var(email_var) else {
        tracing::info!(role, "Skipping seed user ({email_var} not set)");
        return Ok(());
    };
    let password = std::env::var(password_var)
        .with_context(|| format!("{password_var} must be set when {email_var} is"))?;

    if let Err(reason) = validate_password_strength(&password) {
        bail!("{password_var}: {reason}");
    }

    let email = normalize_email(&email);
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        tracing::info!(%email, "Seed user already exists, skipping");
        return Ok(());
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email,
            password_hash,
            role: role.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, role = %user.role, "Seed user created");
    Ok(())
}

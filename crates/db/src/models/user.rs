//! Ops/admin user model.

use serde::Deserialize;
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// Deliberately not `Serialize`: the password hash and lockout bookkeeping
/// must never reach a response body. Handlers build their own public view.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user (seed binary and admin tooling).
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

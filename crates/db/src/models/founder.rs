//! Founder model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `founders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Founder {
    pub id: DbId,
    pub deal_id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub magic_token: String,
    pub token_expires_at: Timestamp,
    pub is_handling_submission: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a founder alongside its deal.
#[derive(Debug)]
pub struct CreateFounder {
    pub name: String,
    pub email: String,
    pub magic_token: String,
    pub token_expires_at: Timestamp,
}

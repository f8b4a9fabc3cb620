//! Milestone model.

use serde::Serialize;
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `milestones` table. Append-only: there is no update DTO
/// and no repository method that mutates or deletes one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub deal_id: DbId,
    pub milestone_type: String,
    pub confirmed_by: String,
    pub confirmed_at: Timestamp,
    pub notes: Option<String>,
}

//! Ops note model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `notes` table joined with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub deal_id: DbId,
    pub content: String,
    pub created_by: DbId,
    pub author_name: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /deals/{id}/notes`.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub content: String,
}

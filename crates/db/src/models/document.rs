//! Document metadata model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub deal_id: DbId,
    pub document_type: String,
    pub filename: String,
    pub storage_path: String,
    pub uploaded_by: String,
    pub uploaded_at: Timestamp,
}

/// DTO for recording an upload.
#[derive(Debug)]
pub struct CreateDocument {
    pub deal_id: DbId,
    pub document_type: String,
    pub filename: String,
    pub storage_path: String,
    pub uploaded_by: String,
}

//! Repository for the `documents` table.

use sqlx::PgPool;

use relieftrack_core::types::DbId;

use crate::models::document::{CreateDocument, Document};

/// Column list for documents queries.
const COLUMNS: &str = "id, deal_id, document_type, filename, storage_path, uploaded_by, \
    uploaded_at";

pub struct DocumentRepo;

impl DocumentRepo {
    /// Record an uploaded document's metadata.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (deal_id, document_type, filename, storage_path, uploaded_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.deal_id)
            .bind(&input.document_type)
            .bind(&input.filename)
            .bind(&input.storage_path)
            .bind(&input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// List a deal's documents, newest upload first.
    pub async fn list_by_deal(pool: &PgPool, deal_id: DbId) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents WHERE deal_id = $1 ORDER BY uploaded_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(deal_id)
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `notes` table.

use sqlx::PgPool;

use relieftrack_core::types::DbId;

use crate::models::note::Note;

/// Column list for notes queries, joined with the author's display name.
const COLUMNS: &str = "n.id, n.deal_id, n.content, n.created_by, u.name AS author_name, \
    n.created_at";

pub struct NoteRepo;

impl NoteRepo {
    /// Append a note, returning it with the author's name resolved.
    pub async fn create(
        pool: &PgPool,
        deal_id: DbId,
        created_by: DbId,
        content: &str,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "WITH n AS (
                 INSERT INTO notes (deal_id, content, created_by)
                 VALUES ($1, $2, $3)
                 RETURNING id, deal_id, content, created_by, created_at
             )
             SELECT {COLUMNS} FROM n JOIN users u ON u.id = n.created_by"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(deal_id)
            .bind(content)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// List a deal's notes, newest first.
    pub async fn list_by_deal(pool: &PgPool, deal_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes n
             JOIN users u ON u.id = n.created_by
             WHERE n.deal_id = $1
             ORDER BY n.created_at DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(deal_id)
            .fetch_all(pool)
            .await
    }
}

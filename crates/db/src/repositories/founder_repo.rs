//! Repository for the `founders` table.

use sqlx::PgPool;

use relieftrack_core::types::DbId;

use crate::models::founder::Founder;

/// Column list for founders queries.
const COLUMNS: &str = "id, deal_id, name, email, magic_token, token_expires_at, \
    is_handling_submission, created_at";

/// Lookups and updates for founders. Creation happens inside
/// `DealRepo::create_with_founder`.
pub struct FounderRepo;

impl FounderRepo {
    /// Resolve a magic token to its founder, if any. Expiry is checked by
    /// the caller so expired and unknown tokens can be reported differently.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Founder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM founders WHERE magic_token = $1");
        sqlx::query_as::<_, Founder>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Find the founder of a deal.
    pub async fn find_by_deal(pool: &PgPool, deal_id: DbId) -> Result<Option<Founder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM founders WHERE deal_id = $1");
        sqlx::query_as::<_, Founder>(&query)
            .bind(deal_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist whether the founder handles the HMRC submission themselves.
    pub async fn set_handling_submission(
        pool: &PgPool,
        id: DbId,
        is_handling_submission: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE founders SET is_handling_submission = $2 WHERE id = $1")
            .bind(id)
            .bind(is_handling_submission)
            .execute(pool)
            .await?;
        Ok(())
    }
}

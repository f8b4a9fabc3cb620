//! Repository for the `milestones` table.
//!
//! Milestones are the audit trail: insert and list only, no update or
//! delete methods by design of the table.

use sqlx::PgPool;

use relieftrack_core::types::DbId;

use crate::models::milestone::Milestone;

/// Column list for milestones queries.
const COLUMNS: &str = "id, deal_id, milestone_type, confirmed_by, confirmed_at, notes";

pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Append a milestone record.
    pub async fn create(
        pool: &PgPool,
        deal_id: DbId,
        milestone_type: &str,
        confirmed_by: &str,
        notes: Option<&str>,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones (deal_id, milestone_type, confirmed_by, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(deal_id)
            .bind(milestone_type)
            .bind(confirmed_by)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// List a deal's milestones, most recent confirmation first.
    pub async fn list_by_deal(pool: &PgPool, deal_id: DbId) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones WHERE deal_id = $1 ORDER BY confirmed_at DESC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(deal_id)
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `investors` table.

use sqlx::PgPool;

use relieftrack_core::types::DbId;

use crate::models::investor::Investor;

/// Column list for investors queries.
const COLUMNS: &str = "id, deal_id, name, address_line1, address_line2, city, postcode, \
    country, shares_issued, amount_subscribed, share_issue_date, share_class, created_at";

/// Read side for investors. The batch insert lives in
/// `DealRepo::create_with_founder`, the only place investors are created.
pub struct InvestorRepo;

impl InvestorRepo {
    /// List a deal's investors in insertion order.
    pub async fn list_by_deal(pool: &PgPool, deal_id: DbId) -> Result<Vec<Investor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM investors WHERE deal_id = $1 ORDER BY id");
        sqlx::query_as::<_, Investor>(&query)
            .bind(deal_id)
            .fetch_all(pool)
            .await
    }
}

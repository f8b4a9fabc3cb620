//! Repository for the `deals` table.

use sqlx::PgPool;

use relieftrack_core::types::DbId;

use crate::models::deal::{CreateDeal, Deal, UpdateDeal};
use crate::models::founder::{CreateFounder, Founder};
use crate::models::investor::{CreateInvestor, Investor};

/// Column list for deals queries.
const COLUMNS: &str = "id, company_name, company_number, scheme_type, investment_date, \
    investment_amount, status, created_by, completed_at, created_at, updated_at";

const FOUNDER_COLUMNS: &str = "id, deal_id, name, email, magic_token, token_expires_at, \
    is_handling_submission, created_at";

const INVESTOR_COLUMNS: &str = "id, deal_id, name, address_line1, address_line2, city, \
    postcode, country, shares_issued, amount_subscribed, share_issue_date, share_class, \
    created_at";

/// CRUD operations for deals, including the transactional creation of a
/// deal together with its founder and initial investor batch.
pub struct DealRepo;

impl DealRepo {
    /// Create a deal with its founder and optional investors in a single
    /// transaction. A failure anywhere rolls back everything, so a deal can
    /// never exist without its founder.
    pub async fn create_with_founder(
        pool: &PgPool,
        deal: &CreateDeal,
        founder: &CreateFounder,
        investors: &[CreateInvestor],
    ) -> Result<(Deal, Founder, Vec<Investor>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deal_query = format!(
            "INSERT INTO deals
                (company_name, company_number, scheme_type, investment_date,
                 investment_amount, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let created_deal = sqlx::query_as::<_, Deal>(&deal_query)
            .bind(&deal.company_name)
            .bind(&deal.company_number)
            .bind(&deal.scheme_type)
            .bind(deal.investment_date)
            .bind(deal.investment_amount)
            .bind(deal.created_by)
            .fetch_one(&mut *tx)
            .await?;

        let founder_query = format!(
            "INSERT INTO founders (deal_id, name, email, magic_token, token_expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {FOUNDER_COLUMNS}"
        );
        let created_founder = sqlx::query_as::<_, Founder>(&founder_query)
            .bind(created_deal.id)
            .bind(&founder.name)
            .bind(&founder.email)
            .bind(&founder.magic_token)
            .bind(founder.token_expires_at)
            .fetch_one(&mut *tx)
            .await?;

        let investor_query = format!(
            "INSERT INTO investors
                (deal_id, name, address_line1, address_line2, city, postcode,
                 country, shares_issued, amount_subscribed, share_issue_date, share_class)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {INVESTOR_COLUMNS}"
        );
        let mut created_investors = Vec::with_capacity(investors.len());
        for investor in investors {
            let row = sqlx::query_as::<_, Investor>(&investor_query)
                .bind(created_deal.id)
                .bind(&investor.name)
                .bind(&investor.address_line1)
                .bind(&investor.address_line2)
                .bind(&investor.city)
                .bind(&investor.postcode)
                .bind(investor.country.as_deref().unwrap_or("United Kingdom"))
                .bind(investor.shares_issued)
                .bind(investor.amount_subscribed)
                .bind(investor.share_issue_date)
                .bind(investor.share_class.as_deref().unwrap_or("Ordinary"))
                .fetch_one(&mut *tx)
                .await?;
            created_investors.push(row);
        }

        tx.commit().await?;
        Ok((created_deal, created_founder, created_investors))
    }

    /// Find a deal by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deals WHERE id = $1");
        sqlx::query_as::<_, Deal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List deals, newest first, optionally filtered by status and/or
    /// scheme type.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        scheme_type: Option<&str>,
    ) -> Result<Vec<Deal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deals
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR scheme_type = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(status)
            .bind(scheme_type)
            .fetch_all(pool)
            .await
    }

    /// Apply an allow-listed partial update, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDeal,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!(
            "UPDATE deals SET
                company_name = COALESCE($2, company_name),
                company_number = COALESCE($3, company_number),
                scheme_type = COALESCE($4, scheme_type),
                investment_date = COALESCE($5, investment_date),
                investment_amount = COALESCE($6, investment_amount),
                status = COALESCE($7, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(id)
            .bind(&input.company_name)
            .bind(&input.company_number)
            .bind(&input.scheme_type)
            .bind(input.investment_date)
            .bind(input.investment_amount)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Set the lifecycle status. Transition legality is the caller's
    /// responsibility (validated through the core state machine).
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!(
            "UPDATE deals SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Terminal ops action: mark complete and stamp `completed_at`.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!(
            "UPDATE deals SET status = 'COMPLETE', completed_at = NOW(), updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a deal. Owned founder/accountant/investor/milestone/
    /// document/note rows go with it via `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

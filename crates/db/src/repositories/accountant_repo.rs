//! Repository for the `accountants` table.

use sqlx::PgPool;

use relieftrack_core::types::{DbId, Timestamp};

use crate::models::accountant::{Accountant, CreateAccountant};

/// Column list for accountants queries.
const COLUMNS: &str = "id, deal_id, firm_name, contact_name, email, phone, magic_token, \
    token_expires_at, has_been_briefed, has_investor_data, created_at";

/// Lookups and the delegation unit of work for accountants.
pub struct AccountantRepo;

impl AccountantRepo {
    /// Resolve a magic token to its accountant, if any.
    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Accountant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accountants WHERE magic_token = $1");
        sqlx::query_as::<_, Accountant>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Find the accountant of a deal, if one was delegated.
    pub async fn find_by_deal(
        pool: &PgPool,
        deal_id: DbId,
    ) -> Result<Option<Accountant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accountants WHERE deal_id = $1");
        sqlx::query_as::<_, Accountant>(&query)
            .bind(deal_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the accountant and flip the founder's self-service flag in
    /// one transaction, so a crash cannot leave a delegated accountant with
    /// the founder still marked as handling submission.
    pub async fn create_with_delegation(
        pool: &PgPool,
        deal_id: DbId,
        founder_id: DbId,
        input: &CreateAccountant,
        email: &str,
        magic_token: &str,
        token_expires_at: Timestamp,
    ) -> Result<Accountant, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO accountants
                (deal_id, firm_name, contact_name, email, phone, magic_token,
                 token_expires_at, has_been_briefed, has_investor_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let accountant = sqlx::query_as::<_, Accountant>(&query)
            .bind(deal_id)
            .bind(&input.firm_name)
            .bind(&input.contact_name)
            .bind(email)
            .bind(&input.phone)
            .bind(magic_token)
            .bind(token_expires_at)
            .bind(input.has_been_briefed)
            .bind(input.has_investor_data)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE founders SET is_handling_submission = FALSE WHERE id = $1")
            .bind(founder_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(accountant)
    }
}

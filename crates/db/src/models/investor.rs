//! Investor model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `investors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Investor {
    pub id: DbId,
    pub deal_id: DbId,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub shares_issued: i64,
    pub amount_subscribed: f64,
    pub share_issue_date: NaiveDate,
    pub share_class: String,
    pub created_at: Timestamp,
}

/// One investor in a deal-creation request, whether entered manually or
/// produced by the spreadsheet normalizer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvestor {
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: Option<String>,
    pub shares_issued: i64,
    pub amount_subscribed: f64,
    pub share_issue_date: NaiveDate,
    pub share_class: Option<String>,
}

//! Deal model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `deals` table.
///
/// `status` is stored as text; the lifecycle enum in the core crate is the
/// authority on which values are legal and how they advance.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deal {
    pub id: DbId,
    pub company_name: String,
    pub company_number: String,
    pub scheme_type: String,
    pub investment_date: NaiveDate,
    pub investment_amount: f64,
    pub status: String,
    pub created_by: DbId,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a deal row.
#[derive(Debug)]
pub struct CreateDeal {
    pub company_name: String,
    pub company_number: String,
    pub scheme_type: String,
    pub investment_date: NaiveDate,
    pub investment_amount: f64,
    pub created_by: DbId,
}

/// Allow-listed mutable fields for `PATCH /deals/{id}`.
///
/// Anything not named here cannot be changed through the update endpoint;
/// there is intentionally no arbitrary-merge path. A `status` value here is
/// the explicit ops override and is validated against the lifecycle enum
/// before it reaches the query.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeal {
    pub company_name: Option<String>,
    pub company_number: Option<String>,
    pub scheme_type: Option<String>,
    pub investment_date: Option<NaiveDate>,
    pub investment_amount: Option<f64>,
    pub status: Option<String>,
}

//! Accountant model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use relieftrack_core::types::{DbId, Timestamp};

/// A row from the `accountants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Accountant {
    pub id: DbId,
    pub deal_id: DbId,
    pub firm_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub magic_token: String,
    pub token_expires_at: Timestamp,
    pub has_been_briefed: bool,
    pub has_investor_data: bool,
    pub created_at: Timestamp,
}

/// Request body for founder-initiated accountant delegation.
#[derive(Debug, Deserialize)]
pub struct CreateAccountant {
    pub firm_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub has_been_briefed: bool,
    #[serde(default)]
    pub has_investor_data: bool,
}

//! Handler for the investor spreadsheet import preview.
//!
//! Parses an uploaded CSV, runs the core normalizer, and returns the
//! canonical records plus the per-row error report. Nothing is persisted:
//! the caller reviews the result and submits it through `POST /deals`.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use relieftrack_core::spreadsheet::{normalize_rows, InvestorRecord};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireOps;
use crate::state::AppState;

/// Query parameters for `POST /deals/import`.
#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// The deal's investment date, used as the fallback share issue date
    /// for rows whose date cell fails to parse.
    pub investment_date: Option<NaiveDate>,
}

/// Response body: normalized records plus the error report.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub investors: Vec<InvestorRecord>,
    pub errors: Vec<String>,
    /// Partial-success summary, present when any row was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    /// Sum of parseable subscription amounts, for prefilling the deal.
    pub total_amount: f64,
}

/// POST /api/v1/deals/import
///
/// Body is the raw CSV text (first row headers).
pub async fn import_investors(
    RequireOps(_user): RequireOps,
    State(_state): State<AppState>,
    Query(params): Query<ImportParams>,
    body: String,
) -> AppResult<Json<ImportResponse>> {
    let rows = parse_csv_rows(&body)?;
    if rows.is_empty() {
        return Err(AppError::BadRequest("No data found in file".into()));
    }

    let fallback = params
        .investment_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let outcome = normalize_rows(&rows, &fallback);

    tracing::info!(
        imported = outcome.records.len(),
        rejected = outcome.errors.len(),
        "Investor spreadsheet normalized"
    );

    let report = outcome.report();
    Ok(Json(ImportResponse {
        investors: outcome.records,
        errors: outcome.errors,
        report,
        total_amount: outcome.total_amount,
    }))
}

/// Parse CSV text into header -> value maps, one per data row.
fn parse_csv_rows(body: &str) -> Result<Vec<HashMap<String, String>>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("Failed to parse CSV: {e}")))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::BadRequest(format!("Failed to parse CSV: {e}")))?;
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_rows_zips_headers() {
        let csv = "Investor Name,Amount,Postcode\nJane Doe,25000,SW1A 1AA\n";
        let rows = parse_csv_rows(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Investor Name"], "Jane Doe");
        assert_eq!(rows[0]["Amount"], "25000");
    }

    #[test]
    fn test_parse_csv_handles_short_rows() {
        // flexible(): a row with fewer cells than headers still parses.
        let csv = "Name,Amount,City\nJane,100\n";
        let rows = parse_csv_rows(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].contains_key("City"));
    }

    #[test]
    fn test_empty_body_yields_no_rows() {
        assert!(parse_csv_rows("").unwrap().is_empty());
    }
}

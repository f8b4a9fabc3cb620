//! Investor spreadsheet import normalizer.
//!
//! Ops upload investor schedules exported from whatever tool the company's
//! lawyers happened to use, so column headers arrive in dozens of spellings
//! and dates in several formats. This module maps free-form headers onto the
//! canonical investor schema, tolerantly parses dates (including Excel
//! serial numbers), and collects per-row errors instead of failing fast.
//!
//! Everything here is a pure transform over parsed rows: no file I/O and no
//! persistence. Callers parse CSV themselves and persist the resulting
//! records through normal deal creation.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical investor field names, matching the `investors` table columns.
pub const CANONICAL_FIELDS: &[&str] = &[
    "name",
    "address_line1",
    "address_line2",
    "city",
    "postcode",
    "country",
    "shares_issued",
    "amount_subscribed",
    "share_issue_date",
    "share_class",
];

/// Free-form header spellings mapped onto canonical field names.
///
/// Lookup happens after lowercasing and trimming, so each alias is written
/// in lowercase. Headers that match nothing pass through unchanged and are
/// ignored downstream.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("name", "name"),
    ("investor name", "name"),
    ("full name", "name"),
    ("investor", "name"),
    ("address line 1", "address_line1"),
    ("addressline1", "address_line1"),
    ("address1", "address_line1"),
    ("address 1", "address_line1"),
    ("street", "address_line1"),
    ("address line 2", "address_line2"),
    ("addressline2", "address_line2"),
    ("address2", "address_line2"),
    ("address 2", "address_line2"),
    ("apt", "address_line2"),
    ("unit", "address_line2"),
    ("city", "city"),
    ("town", "city"),
    ("postcode", "postcode"),
    ("postal code", "postcode"),
    ("zip", "postcode"),
    ("zip code", "postcode"),
    ("country", "country"),
    ("shares", "shares_issued"),
    ("number of shares", "shares_issued"),
    ("shares issued", "shares_issued"),
    ("sharesissued", "shares_issued"),
    ("amount", "amount_subscribed"),
    ("amount subscribed", "amount_subscribed"),
    ("amountsubscribed", "amount_subscribed"),
    ("subscription", "amount_subscribed"),
    ("investment", "amount_subscribed"),
    ("share issue date", "share_issue_date"),
    ("shareissuedate", "share_issue_date"),
    ("issue date", "share_issue_date"),
    ("date", "share_issue_date"),
    ("share class", "share_class"),
    ("shareclass", "share_class"),
    ("class", "share_class"),
];

/// Unix epoch as an Excel serial day number (1899-12-30 day-zero system).
const EXCEL_EPOCH_OFFSET_DAYS: i64 = 25569;

/// A normalized investor row, ready for deal creation.
///
/// Values stay as strings: numeric parsing happens at persistence time, the
/// same place manual-entry investor rows are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorRecord {
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub shares_issued: String,
    pub amount_subscribed: String,
    /// ISO `YYYY-MM-DD`.
    pub share_issue_date: String,
    pub share_class: String,
}

/// The result of normalizing one uploaded sheet.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub records: Vec<InvestorRecord>,
    /// One entry per rejected row, each naming its 1-based spreadsheet row.
    pub errors: Vec<String>,
    /// Sum of the parseable subscription amounts, for prefilling the deal's
    /// investment amount.
    pub total_amount: f64,
}

impl ImportOutcome {
    /// Human-readable summary of what went wrong, if anything did.
    ///
    /// With zero successful records every error is listed; on partial
    /// success the report shows the imported count, the first three errors,
    /// and an overflow count.
    pub fn report(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        if self.records.is_empty() {
            return Some(self.errors.join("\n"));
        }
        let mut report = format!(
            "Imported {} investors. Some rows had issues:\n{}",
            self.records.len(),
            self.errors[..self.errors.len().min(3)].join("\n")
        );
        if self.errors.len() > 3 {
            report.push_str(&format!("\n...and {} more", self.errors.len() - 3));
        }
        Some(report)
    }
}

/// Map a raw header onto its canonical field name.
///
/// Unrecognized headers come back lowercased/trimmed but otherwise
/// untouched; nothing downstream reads them.
pub fn normalize_header(header: &str) -> String {
    let lower = header.trim().to_lowercase();
    for (alias, canonical) in HEADER_ALIASES {
        if *alias == lower {
            return (*canonical).to_string();
        }
    }
    lower
}

/// Normalize a batch of parsed rows (header -> raw value) into canonical
/// investor records plus per-row errors.
///
/// `fallback_issue_date` is the deal's investment date in ISO form, used
/// when a row's date fails every parse.
pub fn normalize_rows(
    rows: &[HashMap<String, String>],
    fallback_issue_date: &str,
) -> ImportOutcome {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let mut fields: HashMap<String, String> = HashMap::new();
        for (header, value) in row {
            fields.insert(normalize_header(header), value.trim().to_string());
        }

        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

        let name = get("name");
        let amount_subscribed = get("amount_subscribed");

        // Blank separator rows are skipped silently.
        if name.is_empty() && amount_subscribed.is_empty() {
            continue;
        }

        // 1-based as it appears in a spreadsheet: header row + 1.
        let row_number = index + 2;
        if name.is_empty() {
            errors.push(format!("Row {row_number}: Missing investor name"));
            continue;
        }
        if amount_subscribed.is_empty() {
            errors.push(format!("Row {row_number}: Missing amount subscribed"));
            continue;
        }

        let share_issue_date = parse_share_date(&get("share_issue_date"))
            .unwrap_or_else(|| fallback_issue_date.to_string());

        let country = get("country");
        let share_class = get("share_class");

        records.push(InvestorRecord {
            name,
            address_line1: get("address_line1"),
            address_line2: get("address_line2"),
            city: get("city"),
            postcode: get("postcode"),
            country: if country.is_empty() {
                "United Kingdom".to_string()
            } else {
                country
            },
            shares_issued: get("shares_issued"),
            amount_subscribed,
            share_issue_date,
            share_class: if share_class.is_empty() {
                "Ordinary".to_string()
            } else {
                share_class
            },
        });
    }

    let total_amount = records
        .iter()
        .filter_map(|r| r.amount_subscribed.parse::<f64>().ok())
        .sum();

    ImportOutcome {
        records,
        errors,
        total_amount,
    }
}

/// Parse a raw date cell into ISO `YYYY-MM-DD`.
///
/// Formats are tried in priority order: ISO passthrough, UK day-first with
/// `/` or `-` separators, a handful of generic fallbacks, and finally an
/// Excel serial day number (days since 1899-12-30). Returns `None` when
/// nothing parses.
pub fn parse_share_date(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    for format in ["%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    for format in ["%Y/%m/%d", "%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    if let Ok(serial) = value.parse::<f64>() {
        if serial.is_finite() && serial > 0.0 {
            let days_since_epoch = serial.trunc() as i64 - EXCEL_EPOCH_OFFSET_DAYS;
            let date = NaiveDate::from_ymd_opt(1970, 1, 1)?
                .checked_add_signed(chrono::Duration::days(days_since_epoch))?;
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_aliased_headers_and_defaults() {
        let rows = vec![row(&[
            ("Investor Name", "Jane Doe"),
            ("Amount", "25000"),
            ("Postal Code", "SW1A 1AA"),
        ])];
        let outcome = normalize_rows(&rows, "2025-01-10");

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.amount_subscribed, "25000");
        assert_eq!(record.postcode, "SW1A 1AA");
        assert_eq!(record.country, "United Kingdom");
        assert_eq!(record.share_class, "Ordinary");
        assert_eq!(record.address_line2, "");
        // No date column: falls back to the deal's investment date.
        assert_eq!(record.share_issue_date, "2025-01-10");
    }

    #[test]
    fn test_header_normalization_table() {
        assert_eq!(normalize_header("  Investor Name "), "name");
        assert_eq!(normalize_header("ZIP"), "postcode");
        assert_eq!(normalize_header("Number of Shares"), "shares_issued");
        assert_eq!(normalize_header("Subscription"), "amount_subscribed");
        assert_eq!(normalize_header("Issue Date"), "share_issue_date");
        // Unrecognized headers pass through lowercased.
        assert_eq!(normalize_header("Tax Reference"), "tax reference");
    }

    #[test]
    fn test_uk_date_rewritten_to_iso() {
        let rows = vec![row(&[
            ("Name", "Jane Doe"),
            ("Amount", "100"),
            ("Date", "15/01/2025"),
        ])];
        let outcome = normalize_rows(&rows, "2024-12-01");
        assert_eq!(outcome.records[0].share_issue_date, "2025-01-15");
    }

    #[test]
    fn test_excel_serial_date() {
        // 45672 days since 1899-12-30 lands on 2025-01-15.
        assert_eq!(parse_share_date("45672").as_deref(), Some("2025-01-15"));
        // 25569 is the Unix epoch itself.
        assert_eq!(parse_share_date("25569").as_deref(), Some("1970-01-01"));
    }

    #[test]
    fn test_date_priority_order() {
        assert_eq!(parse_share_date("2025-01-15").as_deref(), Some("2025-01-15"));
        assert_eq!(parse_share_date("15-01-2025").as_deref(), Some("2025-01-15"));
        assert_eq!(parse_share_date("2025/01/15").as_deref(), Some("2025-01-15"));
        assert_eq!(parse_share_date("15 Jan 2025").as_deref(), Some("2025-01-15"));
        assert_eq!(parse_share_date("not a date"), None);
        assert_eq!(parse_share_date(""), None);
    }

    #[test]
    fn test_missing_amount_reports_row_number_and_keeps_valid_rows() {
        let rows = vec![
            row(&[("Name", "Valid One"), ("Amount", "1000")]),
            row(&[("Name", "No Amount")]),
            row(&[("Name", "Valid Two"), ("Amount", "2000")]),
        ];
        let outcome = normalize_rows(&rows, "2025-01-10");

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        // The bad row is the second data row: header row + 1 + 2 = row 3.
        assert_eq!(outcome.errors[0], "Row 3: Missing amount subscribed");
        assert_eq!(outcome.records[0].name, "Valid One");
        assert_eq!(outcome.records[1].name, "Valid Two");
    }

    #[test]
    fn test_missing_name_rejected() {
        let rows = vec![row(&[("Amount", "500")])];
        let outcome = normalize_rows(&rows, "");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.errors, vec!["Row 2: Missing investor name"]);
    }

    #[test]
    fn test_blank_separator_rows_skipped_silently() {
        let rows = vec![
            row(&[("Name", "Jane"), ("Amount", "100")]),
            row(&[("Name", ""), ("Amount", ""), ("City", "London")]),
            row(&[("Name", "John"), ("Amount", "200")]),
        ];
        let outcome = normalize_rows(&rows, "");
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_total_amount_sums_parseable_values() {
        let rows = vec![
            row(&[("Name", "A"), ("Amount", "100.50")]),
            row(&[("Name", "B"), ("Amount", "200")]),
            row(&[("Name", "C"), ("Amount", "lots")]),
        ];
        let outcome = normalize_rows(&rows, "");
        assert_eq!(outcome.records.len(), 3);
        assert!((outcome.total_amount - 300.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_partial_success_truncates_to_three() {
        let mut rows = vec![row(&[("Name", "Good"), ("Amount", "100")])];
        for _ in 0..5 {
            rows.push(row(&[("Name", "Bad")]));
        }
        let outcome = normalize_rows(&rows, "");
        let report = outcome.report().unwrap();
        assert!(report.starts_with("Imported 1 investors."));
        assert_eq!(report.matches("Missing amount subscribed").count(), 3);
        assert!(report.ends_with("...and 2 more"));
    }

    #[test]
    fn test_report_all_errors_when_nothing_imported() {
        let rows = vec![row(&[("Name", "Bad")]), row(&[("Amount", "1")])];
        let outcome = normalize_rows(&rows, "");
        assert!(outcome.records.is_empty());
        let report = outcome.report().unwrap();
        assert_eq!(
            report,
            "Row 2: Missing amount subscribed\nRow 3: Missing investor name"
        );
    }

    #[test]
    fn test_no_report_when_clean() {
        let rows = vec![row(&[("Name", "Jane"), ("Amount", "100")])];
        assert!(normalize_rows(&rows, "").report().is_none());
    }
}

//! Post-fetch filtering and sorting for the ops deal list.
//!
//! The SQL layer only filters by status and scheme type; free-text search
//! and column sorting happen in memory after the fetch. The deal list is
//! small (one row per investment round), so this keeps the query layer
//! trivial at no real cost.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Accessors the list handler's hydrated deal type provides so the filter
/// and sort logic stays independent of the persistence models.
pub trait DealRecord {
    fn company_name(&self) -> &str;
    fn company_number(&self) -> &str;
    fn founder_name(&self) -> Option<&str>;
    fn investment_amount(&self) -> f64;
    fn created_at(&self) -> Timestamp;
}

/// Sortable columns (`?sort_by=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Company,
    Amount,
}

impl SortField {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "date" => Ok(SortField::Date),
            "company" => Ok(SortField::Company),
            "amount" => Ok(SortField::Amount),
            other => Err(CoreError::Validation(format!("Unknown sort field '{other}'"))),
        }
    }
}

/// Sort direction (`?sort_order=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CoreError::Validation(format!("Unknown sort order '{other}'"))),
        }
    }
}

/// Case-insensitive substring match against company name, company number,
/// and founder name.
pub fn matches_search<T: DealRecord>(deal: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    deal.company_name().to_lowercase().contains(&needle)
        || deal.company_number().to_lowercase().contains(&needle)
        || deal
            .founder_name()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
}

/// Sort deals in place by the given field and direction.
pub fn sort_deals<T: DealRecord>(deals: &mut [T], field: SortField, order: SortOrder) {
    deals.sort_by(|a, b| {
        let ordering = match field {
            SortField::Company => a.company_name().cmp(b.company_name()),
            SortField::Amount => a
                .investment_amount()
                .partial_cmp(&b.investment_amount())
                .unwrap_or(std::cmp::Ordering::Equal),
            SortField::Date => a.created_at().cmp(&b.created_at()),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    struct Fixture {
        company_name: String,
        company_number: String,
        founder_name: Option<String>,
        amount: f64,
        created_at: Timestamp,
    }

    impl DealRecord for Fixture {
        fn company_name(&self) -> &str {
            &self.company_name
        }
        fn company_number(&self) -> &str {
            &self.company_number
        }
        fn founder_name(&self) -> Option<&str> {
            self.founder_name.as_deref()
        }
        fn investment_amount(&self) -> f64 {
            self.amount
        }
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
    }

    fn fixture(name: &str, number: &str, founder: Option<&str>, amount: f64, day: u32) -> Fixture {
        Fixture {
            company_name: name.to_string(),
            company_number: number.to_string(),
            founder_name: founder.map(str::to_string),
            amount,
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_search_matches_name_number_and_founder() {
        let deal = fixture("TechStart Ltd", "12345678", Some("John Smith"), 100.0, 1);
        assert!(matches_search(&deal, "techstart"));
        assert!(matches_search(&deal, "3456"));
        assert!(matches_search(&deal, "john"));
        assert!(matches_search(&deal, ""));
        assert!(!matches_search(&deal, "greenenergy"));
    }

    #[test]
    fn test_search_tolerates_missing_founder() {
        let deal = fixture("TechStart Ltd", "12345678", None, 100.0, 1);
        assert!(!matches_search(&deal, "john"));
    }

    #[test]
    fn test_sort_by_amount_desc() {
        let mut deals = vec![
            fixture("A", "1", None, 100.0, 1),
            fixture("B", "2", None, 300.0, 2),
            fixture("C", "3", None, 200.0, 3),
        ];
        sort_deals(&mut deals, SortField::Amount, SortOrder::Desc);
        let names: Vec<_> = deals.iter().map(|d| d.company_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_by_company_asc() {
        let mut deals = vec![
            fixture("Zeta", "1", None, 0.0, 1),
            fixture("Alpha", "2", None, 0.0, 2),
        ];
        sort_deals(&mut deals, SortField::Company, SortOrder::Asc);
        assert_eq!(deals[0].company_name, "Alpha");
    }

    #[test]
    fn test_sort_by_date() {
        let mut deals = vec![
            fixture("Old", "1", None, 0.0, 1),
            fixture("New", "2", None, 0.0, 20),
        ];
        sort_deals(&mut deals, SortField::Date, SortOrder::Desc);
        assert_eq!(deals[0].company_name, "New");
        sort_deals(&mut deals, SortField::Date, SortOrder::Asc);
        assert_eq!(deals[0].company_name, "Old");
    }

    #[test]
    fn test_parse_sort_params() {
        assert_eq!(SortField::parse("amount").unwrap(), SortField::Amount);
        assert_eq!(SortOrder::parse("asc").unwrap(), SortOrder::Asc);
        assert!(SortField::parse("size").is_err());
        assert!(SortOrder::parse("down").is_err());
    }
}

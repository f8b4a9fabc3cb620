//! Document type constants and validation.

use crate::error::CoreError;

/// Investor schedule spreadsheet.
pub const DOC_INVESTOR_SCHEDULE: &str = "INVESTOR_SCHEDULE";

/// Investment deck shared with investors.
pub const DOC_INVESTMENT_DECK: &str = "INVESTMENT_DECK";

/// Companies House SH01 (return of allotment of shares).
pub const DOC_SH01: &str = "SH01";

/// HMRC EIS2/SEIS2 approval letter. Uploading this type advances the deal
/// lifecycle (see `lifecycle::apply_eis2_upload`).
pub const DOC_EIS2: &str = "EIS2";

/// EIS3/SEIS3 investor certificate.
pub const DOC_EIS3: &str = "EIS3";

/// All accepted document type tags.
pub const VALID_DOCUMENT_TYPES: &[&str] = &[
    DOC_INVESTOR_SCHEDULE,
    DOC_INVESTMENT_DECK,
    DOC_SH01,
    DOC_EIS2,
    DOC_EIS3,
];

/// Validate an uploaded document's type tag.
pub fn validate_document_type(document_type: &str) -> Result<(), CoreError> {
    if VALID_DOCUMENT_TYPES.contains(&document_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid document type '{document_type}'. Must be one of: {}",
            VALID_DOCUMENT_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types_accepted() {
        for doc_type in VALID_DOCUMENT_TYPES {
            assert!(validate_document_type(doc_type).is_ok());
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = validate_document_type("PITCH_VIDEO");
        assert!(result.is_err());
    }

    #[test]
    fn test_lowercase_not_accepted() {
        assert!(validate_document_type("eis2").is_err());
    }
}

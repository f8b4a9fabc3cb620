//! Field validation helpers used by the API layer.

use crate::error::CoreError;

/// SEIS scheme identifier.
pub const SCHEME_SEIS: &str = "SEIS";

/// EIS scheme identifier.
pub const SCHEME_EIS: &str = "EIS";

/// The two supported scheme types.
pub const VALID_SCHEME_TYPES: &[&str] = &[SCHEME_SEIS, SCHEME_EIS];

/// Validate a deal's scheme type.
pub fn validate_scheme_type(scheme_type: &str) -> Result<(), CoreError> {
    if VALID_SCHEME_TYPES.contains(&scheme_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid scheme type '{scheme_type}'. Must be one of: {}",
            VALID_SCHEME_TYPES.join(", ")
        )))
    }
}

/// Validate ops note content: non-empty after trimming.
pub fn validate_note_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        Err(CoreError::Validation("Note content is required".into()))
    } else {
        Ok(())
    }
}

/// Ensure a required text field is present and non-blank.
pub fn require_field(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("Missing required field '{field}'")))
    } else {
        Ok(())
    }
}

/// Emails are stored lowercased so token-less lookups by address behave
/// case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_types() {
        assert!(validate_scheme_type("SEIS").is_ok());
        assert!(validate_scheme_type("EIS").is_ok());
        assert!(validate_scheme_type("VCT").is_err());
        assert!(validate_scheme_type("seis").is_err());
    }

    #[test]
    fn test_note_content() {
        assert!(validate_note_content("Chased HMRC by phone").is_ok());
        assert!(validate_note_content("").is_err());
        assert!(validate_note_content("   \n").is_err());
    }

    #[test]
    fn test_require_field() {
        assert!(require_field("Acme Ltd", "company_name").is_ok());
        let err = require_field(" ", "company_name").unwrap_err();
        assert!(err.to_string().contains("company_name"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Jane@Example.COM "), "jane@example.com");
    }
}

//! Magic-token issuance and expiry rules for the founder/accountant portals.
//!
//! A magic token is an opaque bearer credential embedded in a portal URL:
//! a v4 UUID with a base-36 issuance-time suffix. Tokens are valid for a
//! fixed seven days from issuance; there is no refresh or extension-on-use.
//! Uniqueness is enforced per party table at the storage layer.

use crate::error::CoreError;
use crate::lifecycle::Party;
use crate::types::Timestamp;

/// Fixed token lifetime. Every issued token expires exactly this many days
/// after issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// A freshly minted token and its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Mint a new opaque portal token expiring [`TOKEN_TTL_DAYS`] from `now`.
pub fn issue_token(now: Timestamp) -> IssuedToken {
    let token = format!(
        "{}-{}",
        uuid::Uuid::new_v4(),
        to_base36(now.timestamp_millis())
    );
    IssuedToken {
        token,
        expires_at: now + chrono::Duration::days(TOKEN_TTL_DAYS),
    }
}

/// Check whether a stored token is still within its validity window.
///
/// Expiry is strict: a token is rejected only once `now` is past
/// `expires_at`, so a link used at exactly its expiry instant still works.
pub fn check_expiry(expires_at: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if now > expires_at {
        Err(CoreError::ExpiredToken)
    } else {
        Ok(())
    }
}

/// Build the portal URL for a token holder.
pub fn portal_link(base_url: &str, party: Party, token: &str) -> String {
    format!(
        "{}/portal/{}/{token}",
        base_url.trim_end_matches('/'),
        party.as_str()
    )
}

/// Lowercase base-36 rendering of a non-negative integer.
fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_issued_token_expires_in_seven_days() {
        let now = at(1_752_000_000);
        let issued = issue_token(now);
        assert_eq!(issued.expires_at - now, chrono::Duration::days(7));
    }

    #[test]
    fn test_tokens_are_unique() {
        let now = at(1_752_000_000);
        let a = issue_token(now);
        let b = issue_token(now);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_token_carries_base36_suffix() {
        let now = at(1_752_000_000);
        let issued = issue_token(now);
        let suffix = issued.token.rsplit('-').next().unwrap();
        assert_eq!(suffix, to_base36(now.timestamp_millis()));
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_valid_until_exactly_expiry() {
        let issued_at = at(1_752_000_000);
        let issued = issue_token(issued_at);

        assert!(check_expiry(issued.expires_at, issued_at).is_ok());
        // Exactly at the expiry instant the link still resolves.
        assert!(check_expiry(issued.expires_at, issued.expires_at).is_ok());
        // One second later it does not.
        let after = issued.expires_at + chrono::Duration::seconds(1);
        assert_matches!(
            check_expiry(issued.expires_at, after),
            Err(CoreError::ExpiredToken)
        );
    }

    #[test]
    fn test_tokens_expire_independently() {
        // Two tokens issued seven days apart each fail exactly after their
        // own seven-day mark.
        let first_issued = at(1_752_000_000);
        let second_issued = first_issued + chrono::Duration::days(7);
        let first = issue_token(first_issued);
        let second = issue_token(second_issued);

        let between = first.expires_at + chrono::Duration::hours(1);
        assert_matches!(
            check_expiry(first.expires_at, between),
            Err(CoreError::ExpiredToken)
        );
        assert!(check_expiry(second.expires_at, between).is_ok());

        let later = second.expires_at + chrono::Duration::hours(1);
        assert_matches!(
            check_expiry(second.expires_at, later),
            Err(CoreError::ExpiredToken)
        );
    }

    #[test]
    fn test_portal_link_shape() {
        assert_eq!(
            portal_link("https://portal.example.com/", Party::Founder, "abc"),
            "https://portal.example.com/portal/founder/abc"
        );
        assert_eq!(
            portal_link("http://localhost:3000", Party::Accountant, "xyz"),
            "http://localhost:3000/portal/accountant/xyz"
        );
    }

    #[test]
    fn test_base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_752_000_000_000), "mcuvkbuo");
    }
}

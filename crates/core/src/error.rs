use crate::types::DbId;

/// Domain error taxonomy shared by the db and api crates.
///
/// The two token variants exist because portal callers must see different
/// messages: an expired link tells the holder to request a new one, while an
/// unrecognized link gets a generic invalid-link error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid or expired link")]
    InvalidToken,

    #[error("Token has expired. Please request a new link.")]
    ExpiredToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

//! Shared response envelope types for API handlers.
//!
//! Simple list/detail responses use a `{ "data": ... }` envelope. Handlers
//! with richer payloads (login, deal creation, portal views) define their
//! own typed response structs instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

//! Route definitions for the token-gated portal.
//!
//! No session middleware: the magic token in the path is the credential.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::portal;
use crate::state::AppState;

/// Routes mounted at `/portal`.
///
/// ```text
/// GET  /{token}             -> get_portal
/// POST /{token}             -> post_action
/// POST /{token}/accountant  -> add_accountant (founder tokens only)
/// POST /{token}/upload      -> upload_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{token}",
            get(portal::get_portal).post(portal::post_action),
        )
        .route("/{token}/accountant", post(portal::add_accountant))
        .route("/{token}/upload", post(portal::upload_document))
}

//! Route definitions for the `/deals` resource (ops dashboard).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{deals, import};
use crate::state::AppState;

/// Routes mounted at `/deals`. All require an ops session.
///
/// ```text
/// GET    /                 -> list (?status, scheme_type, search, sort_by, sort_order)
/// POST   /                 -> create
/// POST   /import           -> import_investors (CSV body)
/// GET    /{id}             -> get_by_id
/// PATCH  /{id}             -> update
/// DELETE /{id}             -> delete
/// POST   /{id}/complete    -> complete
/// POST   /{id}/notes       -> create_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(deals::list).post(deals::create))
        .route("/import", post(import::import_investors))
        .route(
            "/{id}",
            get(deals::get_by_id)
                .patch(deals::update)
                .delete(deals::delete),
        )
        .route("/{id}/complete", post(deals::complete))
        .route("/{id}/notes", post(deals::create_note))
}

pub mod auth;
pub mod deals;
pub mod health;
pub mod portal;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/logout                     logout
/// /auth/me                         current session user
///
/// /deals                           list, create (ops)
/// /deals/import                    spreadsheet import preview (ops)
/// /deals/{id}                      get, patch, delete (ops)
/// /deals/{id}/complete             terminal completion (ops)
/// /deals/{id}/notes                append note (ops)
///
/// /portal/{token}                  party view (GET), lifecycle action (POST)
/// /portal/{token}/accountant       founder delegates to accountant
/// /portal/{token}/upload           multipart document upload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/deals", deals::router())
        .nest("/portal", portal::router())
}

//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement, enforcing authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use relieftrack_core::error::CoreError;
use relieftrack_core::roles::{ROLE_ADMIN, ROLE_OPS};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `OPS` or `ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// Every dashboard endpoint takes this extractor; portal endpoints take
/// none (the magic token is the credential there).
///
/// ```ignore
/// async fn ops_only(RequireOps(user): RequireOps) -> AppResult<Json<()>> {
///     // user is guaranteed to be ops staff here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOps(pub AuthUser);

impl FromRequestParts<AppState> for RequireOps {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_OPS && user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Ops or Admin role required".into(),
            )));
        }
        Ok(RequireOps(user))
    }
}

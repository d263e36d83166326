//! JWT-based authentication extractors.
//!
//! [`CurrentUser`] validates the Bearer token and then re-fetches the user
//! row from the store, so handlers always authorize against the latest role
//! set -- the token is a session pointer, never a source of roles. A token
//! whose user no longer exists is treated as an expired session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use classfit_core::error::CoreError;
use classfit_db::models::user::User;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated user's latest store record.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = state.store.find_user(claims.sub).await?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Session user no longer exists".into(),
            ))
        })?;

        Ok(CurrentUser(user))
    }
}

/// Optional authentication for endpoints that serve both guests and
/// members (booking creation). Never rejects: any auth failure, including a
/// briefly unavailable store, degrades to a guest request.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(CurrentUser(user)) => Ok(MaybeUser(Some(user))),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

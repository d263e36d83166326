//! Role-gated extractors layered on top of [`CurrentUser`].
//!
//! Each extractor re-checks the role predicate against the freshly loaded
//! user record, so a role revoked after login takes effect on the next
//! request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use classfit_core::error::CoreError;
use classfit_core::roles;
use classfit_db::models::user::User;

use crate::error::AppError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Management only: role assignment and destructive deletes.
#[derive(Debug, Clone)]
pub struct RequireManagement(pub User);

impl FromRequestParts<AppState> for RequireManagement {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !roles::can_manage_roles(&user.role_set()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Management role required".into(),
            )));
        }
        Ok(RequireManagement(user))
    }
}

/// Admin console access: admin or management.
#[derive(Debug, Clone)]
pub struct RequireAdminConsole(pub User);

impl FromRequestParts<AppState> for RequireAdminConsole {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !roles::can_access_admin_console(&user.role_set()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or management role required".into(),
            )));
        }
        Ok(RequireAdminConsole(user))
    }
}

/// Front-desk roles that may look up check-in codes and settle payments.
#[derive(Debug, Clone)]
pub struct RequireFrontDesk(pub User);

impl FromRequestParts<AppState> for RequireFrontDesk {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !roles::can_settle_payment(&user.role_set()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cashier, admin or management role required".into(),
            )));
        }
        Ok(RequireFrontDesk(user))
    }
}

//! Handlers for the admin console and management-only operations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use classfit_core::account;
use classfit_core::booking::authorize_delete;
use classfit_core::error::CoreError;
use classfit_core::roles::Role;
use classfit_core::types::DbId;
use classfit_db::models::booking::Booking;
use classfit_db::models::user::{UserPatch, UserResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdminConsole, RequireManagement};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/roles`.
#[derive(Debug, Deserialize)]
pub struct UpdateRolesRequest {
    pub roles: Vec<String>,
    /// Optional commission rate change, applied together with a trainer
    /// approval.
    pub commission_rate: Option<f64>,
}

/// GET /api/v1/admin/bookings
///
/// Every booking in the system, for the admin dashboard.
pub async fn list_bookings(
    RequireAdminConsole(_user): RequireAdminConsole,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let mut bookings = state.store.list_bookings().await?;
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(DataResponse::new(bookings)))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdminConsole(_user): RequireAdminConsole,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users: Vec<UserResponse> = state
        .store
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(DataResponse::new(users)))
}

/// PUT /api/v1/admin/users/{id}/roles
///
/// Replace a user's role set. This is also the trainer approval path:
/// management swaps `trainer_pending` for `trainer` and sets the commission
/// rate.
pub async fn update_roles(
    RequireManagement(_manager): RequireManagement,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRolesRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let target = state
        .store
        .find_user(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;

    let new_roles: Vec<Role> = input
        .roles
        .iter()
        .map(|name| {
            Role::parse(name)
                .ok_or_else(|| CoreError::Validation(format!("unknown role '{name}'")))
        })
        .collect::<Result<_, _>>()?;

    account::validate_role_update(&target.role_set(), &new_roles)?;

    let patch = UserPatch {
        roles: Some(new_roles.iter().map(|r| r.as_str().to_string()).collect()),
        commission_rate: input.commission_rate,
        ..Default::default()
    };

    let updated = state
        .store
        .update_user(id, &patch)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;

    tracing::info!(user_id = id, roles = ?updated.roles, "role set updated");

    Ok(Json(DataResponse::new(updated.into())))
}

/// DELETE /api/v1/admin/users/{id}
pub async fn delete_user(
    RequireManagement(_manager): RequireManagement,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let target = state
        .store
        .find_user(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;

    account::validate_user_delete(&target.role_set())?;

    if !state.store.delete_user(id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/bookings/{id}
///
/// Hard delete, permitted regardless of booking status.
pub async fn delete_booking(
    RequireManagement(manager): RequireManagement,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize_delete(&manager.actor())?;

    if !state.store.delete_booking(id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }));
    }

    tracing::info!(booking_id = id, "booking deleted");

    Ok(StatusCode::NO_CONTENT)
}

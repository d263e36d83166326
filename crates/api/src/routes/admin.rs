//! Route definitions for the admin console (`/admin`).

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /bookings          -> all bookings (admin/management)
/// GET    /users             -> all users (admin/management)
/// PUT    /users/{id}/roles  -> replace role set (management only)
/// DELETE /users/{id}        -> delete account (management only)
/// DELETE /bookings/{id}     -> hard delete booking (management only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(admin::list_bookings))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/roles", put(admin::update_roles))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/bookings/{id}", delete(admin::delete_booking))
}

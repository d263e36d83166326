pub mod admin;
pub mod auth;
pub mod booking;
pub mod health;
pub mod trainer;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register             register (public)
/// /auth/login                login (public)
/// /auth/me                   current user
///
/// /users/me                  update own profile (PUT)
///
/// /trainers                  trainer directory (public)
/// /trainers/apply            trainer application (POST)
/// /trainer/bookings          trainer's own bookings
///
/// /bookings                  create (public; guests allowed)
/// /bookings/checkin/{code}   front-desk code lookup
/// /bookings/{id}/confirm     trainer accepts (POST)
/// /bookings/{id}/reject      trainer declines (POST)
/// /bookings/{id}/cancel      customer cancels (POST)
/// /bookings/{id}/complete    trainer marks held (POST)
/// /bookings/{id}/settle      front desk records payment (POST)
/// /bookings/{id}/review      customer reviews completed booking (POST)
/// /my/bookings               customer's own bookings
///
/// /admin/bookings            all bookings (admin/management)
/// /admin/users               all users (admin/management)
/// /admin/users/{id}/roles    replace role set (management, PUT)
/// /admin/users/{id}          delete account (management, DELETE)
/// /admin/bookings/{id}       hard delete booking (management, DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", auth::profile_router())
        .nest("/trainers", trainer::router())
        .nest("/trainer", trainer::dashboard_router())
        .nest("/bookings", booking::router())
        .nest("/my", booking::my_router())
        .nest("/admin", admin::router())
}

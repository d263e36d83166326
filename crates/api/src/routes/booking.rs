//! Route definitions for bookings, the customer dashboard, and check-in.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST /               -> create (public; guests allowed)
/// GET  /checkin/{code} -> front-desk lookup (cashier/admin/management)
/// POST /{id}/confirm   -> owning trainer
/// POST /{id}/reject    -> owning trainer
/// POST /{id}/cancel    -> owning customer
/// POST /{id}/complete  -> owning trainer
/// POST /{id}/settle    -> cashier/admin/management
/// POST /{id}/review    -> owning customer, completed only
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(booking::create))
        .route("/checkin/{code}", get(booking::checkin_lookup))
        .route("/{id}/confirm", post(booking::confirm))
        .route("/{id}/reject", post(booking::reject))
        .route("/{id}/cancel", post(booking::cancel))
        .route("/{id}/complete", post(booking::complete))
        .route("/{id}/settle", post(booking::settle))
        .route("/{id}/review", post(booking::review))
}

/// Routes mounted at `/my`.
pub fn my_router() -> Router<AppState> {
    Router::new().route("/bookings", get(booking::my_bookings))
}

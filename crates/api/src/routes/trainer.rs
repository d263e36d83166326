//! Route definitions for the trainer directory and trainer dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::trainer;
use crate::state::AppState;

/// Routes mounted at `/trainers`.
///
/// ```text
/// GET  /       -> list approved trainers (public)
/// POST /apply  -> trainer application / registration (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trainer::list_trainers))
        .route("/apply", post(trainer::apply))
}

/// Routes mounted at `/trainer`.
pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/bookings", get(trainer::my_trainer_bookings))
}

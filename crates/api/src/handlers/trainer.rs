//! Handlers for the `/trainers` resource and the trainer's own dashboard.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use classfit_core::error::CoreError;
use classfit_core::roles::Role;
use classfit_db::models::booking::Booking;
use classfit_db::models::user::{NewUser, UserResponse};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /trainers/apply`.
#[derive(Debug, Deserialize)]
pub struct TrainerApplicationRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub languages: Option<Vec<String>>,
}

/// GET /api/v1/trainers
///
/// Public directory of approved trainers.
pub async fn list_trainers(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let trainers: Vec<UserResponse> = state
        .store
        .list_users()
        .await?
        .into_iter()
        .filter(|u| u.role_set().contains(&Role::Trainer))
        .map(UserResponse::from)
        .collect();
    Ok(Json(DataResponse::new(trainers)))
}

/// POST /api/v1/trainers/apply
///
/// Registration variant for coaches: creates a new account holding
/// `trainer_pending`. Management later swaps it for `trainer` (and sets the
/// commission rate) through the admin role routes.
pub async fn apply(
    State(state): State<AppState>,
    Json(input): Json<TrainerApplicationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let email = input.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "a valid email address is required".into(),
        )));
    }
    if input.display_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "display name is required".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "an account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .insert_user(&NewUser {
            display_name: input.display_name.trim().to_string(),
            email,
            password_hash,
            phone: input.phone,
            bio: input.bio,
            roles: vec![Role::TrainerPending.as_str().to_string()],
            commission_rate: None,
            languages: input.languages.unwrap_or_default(),
        })
        .await?;

    tracing::info!(user_id = user.id, "trainer application submitted");

    Ok((StatusCode::CREATED, Json(DataResponse::new(user.into()))))
}

/// GET /api/v1/trainer/bookings
///
/// The calling trainer's own bookings, soonest session first.
pub async fn my_trainer_bookings(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    if !user.role_set().contains(&Role::Trainer) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Trainer role required".into(),
        )));
    }

    let mut bookings: Vec<Booking> = state
        .store
        .list_bookings()
        .await?
        .into_iter()
        .filter(|b| b.trainer_id == user.id)
        .collect();
    bookings.sort_by(|a, b| (a.session_date, a.session_time).cmp(&(b.session_date, b.session_time)));
    Ok(Json(DataResponse::new(bookings)))
}

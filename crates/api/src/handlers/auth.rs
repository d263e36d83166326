//! Handlers for the `/auth` resource (register, login, current user).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use classfit_core::error::CoreError;
use classfit_db::models::user::{NewUser, UserPatch, UserResponse};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Request body for `PUT /users/me`. Profile fields only; roles and
/// commission rates are management-owned and go through the admin routes.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub languages: Option<Vec<String>>,
    pub unavailable_dates: Option<Vec<chrono::NaiveDate>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new customer account. Every account starts with the `user` role;
/// trainer status comes later via the application/approval flow.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
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
            bio: None,
            roles: vec!["user".to_string()],
            commission_rate: None,
            languages: Vec::new(),
        })
        .await?;

    tracing::info!(user_id = user.id, "registered new account");

    Ok((StatusCode::CREATED, Json(DataResponse::new(user.into()))))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token; the token
/// carries the user id only, so role changes apply on the next request.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();

    // Same error for unknown email and wrong password.
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.into(),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<DataResponse<UserResponse>> {
    Json(DataResponse::new(user.into()))
}

/// PUT /api/v1/users/me
///
/// Update the caller's own profile.
pub async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(name) = &input.display_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "display name must not be empty".into(),
            )));
        }
    }

    let patch = UserPatch {
        display_name: input.display_name.map(|s| s.trim().to_string()),
        phone: input.phone,
        image_url: input.image_url,
        bio: input.bio,
        languages: input.languages,
        unavailable_dates: input.unavailable_dates,
        ..Default::default()
    };

    let updated = state
        .store
        .update_user(user.id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    Ok(Json(DataResponse::new(updated.into())))
}

//! Handlers for the `/bookings` resource: creation, the lifecycle events
//! (confirm, reject, cancel, complete, settle), reviews, and the front-desk
//! check-in code lookup.
//!
//! Every lifecycle handler follows the same shape: load the booking,
//! authorize the actor against that exact event, then run the transition
//! through the state machine. Authorization runs first so a forbidden actor
//! always sees 403, never a transition conflict.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use classfit_core::booking::{self, BookingEvent, PaymentMethod};
use classfit_core::checkin;
use classfit_core::error::CoreError;
use classfit_core::roles::Role;
use classfit_core::settlement;
use classfit_core::types::DbId;
use classfit_db::models::booking::{Booking, BookingPatch, NewBooking};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{CurrentUser, MaybeUser};
use crate::middleware::rbac::RequireFrontDesk;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts to find an unused check-in code before giving up.
const CODE_GENERATION_ATTEMPTS: u32 = 10;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
///
/// Guests supply their contact details directly; logged-in customers are
/// additionally linked to the booking so they can cancel and review it.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub trainer_id: DbId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

/// Request body for `POST /bookings/{id}/settle`.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub payment_method: PaymentMethod,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings
///
/// Create a booking in `pending`. Open to guests; an authenticated caller
/// becomes the booking's owning customer.
pub async fn create(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    booking::validate_new_booking(
        &input.customer_name,
        &input.customer_phone,
        input.duration_minutes,
        input.price_cents,
    )?;

    let trainer = state
        .store
        .find_user(input.trainer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trainer",
            id: input.trainer_id,
        })?;
    if !trainer.role_set().contains(&Role::Trainer) {
        return Err(AppError::Core(CoreError::Validation(
            "the selected user is not an approved trainer".into(),
        )));
    }

    let check_in_code = unused_code(&state).await?;

    let created = state
        .store
        .insert_booking(&NewBooking {
            check_in_code,
            trainer_id: trainer.id,
            customer_user_id: user.as_ref().map(|u| u.id),
            customer_name: input.customer_name.trim().to_string(),
            customer_phone: input.customer_phone.trim().to_string(),
            customer_email: input.customer_email,
            session_date: input.session_date,
            session_time: input.session_time,
            duration_minutes: input.duration_minutes,
            price_cents: input.price_cents,
        })
        .await?;

    tracing::info!(
        booking_id = created.id,
        trainer_id = created.trainer_id,
        guest = created.customer_user_id.is_none(),
        "booking created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/v1/my/bookings
///
/// Bookings owned by the calling customer, newest session first.
pub async fn my_bookings(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let mut bookings: Vec<Booking> = state
        .store
        .list_bookings()
        .await?
        .into_iter()
        .filter(|b| b.customer_user_id == Some(user.id))
        .collect();
    bookings.sort_by(|a, b| (b.session_date, b.session_time).cmp(&(a.session_date, a.session_time)));
    Ok(Json(DataResponse::new(bookings)))
}

/// POST /api/v1/bookings/{id}/confirm (trainer accepts)
pub async fn confirm(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    apply_event(&state, &user, id, BookingEvent::Confirm).await
}

/// POST /api/v1/bookings/{id}/reject (trainer declines a pending booking)
pub async fn reject(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    apply_event(&state, &user, id, BookingEvent::Reject).await
}

/// POST /api/v1/bookings/{id}/cancel (owning customer)
pub async fn cancel(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    apply_event(&state, &user, id, BookingEvent::Cancel).await
}

/// POST /api/v1/bookings/{id}/complete (trainer marks the session held)
pub async fn complete(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    apply_event(&state, &user, id, BookingEvent::MarkDone).await
}

/// POST /api/v1/bookings/{id}/settle
///
/// Front desk records the payment. The commission split is computed from the
/// trainer's rate at this moment and frozen on the row; the transition to
/// `completed` doubles as the idempotence guard against double settlement.
pub async fn settle(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SettleRequest>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = load_booking(&state, id).await?;
    let status = typed_status(&booking)?;

    booking::authorize_event(&user.actor(), &booking.parties(), BookingEvent::Settle)?;
    let next = status.apply(BookingEvent::Settle)?;

    // Rate at settlement time; missing trainer (deleted account) falls back
    // to the default rate rather than blocking the payment.
    let commission_rate = state
        .store
        .find_user(booking.trainer_id)
        .await?
        .and_then(|t| t.commission_rate);
    let split = settlement::split_price(booking.price_cents, commission_rate);

    let patch = BookingPatch {
        status: Some(next.as_str().to_string()),
        payment_method: Some(input.payment_method.as_str().to_string()),
        commission_cents: Some(split.commission_cents),
        trainer_earnings_cents: Some(split.trainer_earnings_cents),
        settled_at: Some(Utc::now()),
        ..Default::default()
    };

    let updated = state
        .store
        .update_booking(id, &patch)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;

    tracing::info!(
        booking_id = id,
        payment_method = %input.payment_method.as_str(),
        commission_cents = split.commission_cents,
        trainer_earnings_cents = split.trainer_earnings_cents,
        "booking settled"
    );

    Ok(Json(DataResponse::new(updated)))
}

/// POST /api/v1/bookings/{id}/review
///
/// Owning customer flags a completed booking as reviewed, once.
pub async fn review(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = load_booking(&state, id).await?;
    let status = typed_status(&booking)?;

    booking::authorize_review(
        &user.actor(),
        &booking.parties(),
        status,
        booking.has_been_reviewed,
    )?;

    let patch = BookingPatch {
        has_been_reviewed: Some(true),
        ..Default::default()
    };
    let updated = state
        .store
        .update_booking(id, &patch)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;

    Ok(Json(DataResponse::new(updated)))
}

/// GET /api/v1/bookings/checkin/{code}
///
/// Front-desk lookup of a booking by its check-in code. Codes are stored
/// uppercase; the lookup normalizes so staff can type them either way.
pub async fn checkin_lookup(
    RequireFrontDesk(_user): RequireFrontDesk,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let code = code.trim().to_uppercase();
    let booking = state
        .store
        .find_booking_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no booking with check-in code {code}")))?;
    Ok(Json(DataResponse::new(booking)))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Authorize and run one lifecycle event, persisting the new status.
async fn apply_event(
    state: &AppState,
    user: &classfit_db::models::user::User,
    id: DbId,
    event: BookingEvent,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = load_booking(state, id).await?;
    let status = typed_status(&booking)?;

    booking::authorize_event(&user.actor(), &booking.parties(), event)?;
    let next = status.apply(event)?;

    let updated = state
        .store
        .update_booking(id, &BookingPatch::status_only(next))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;

    tracing::info!(booking_id = id, %event, from = %status, to = %next, "booking transition");

    Ok(Json(DataResponse::new(updated)))
}

async fn load_booking(state: &AppState, id: DbId) -> AppResult<Booking> {
    state
        .store
        .find_booking(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
}

/// A stored status name the state machine does not recognize is data
/// corruption, not a client error.
fn typed_status(booking: &Booking) -> AppResult<classfit_core::booking::BookingStatus> {
    booking.lifecycle_status().ok_or_else(|| {
        AppError::InternalError(format!(
            "booking {} has unknown status '{}'",
            booking.id, booking.status
        ))
    })
}

/// Generate a check-in code not already held by another booking.
async fn unused_code(state: &AppState) -> AppResult<String> {
    for _ in 0..CODE_GENERATION_ATTEMPTS {
        let code = checkin::generate_code();
        if state.store.find_booking_by_code(&code).await?.is_none() {
            return Ok(code);
        }
    }
    Err(AppError::InternalError(
        "could not allocate a unique check-in code".into(),
    ))
}

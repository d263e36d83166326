//! Repository for the `bookings` table.

use sqlx::PgPool;

use classfit_core::types::DbId;

use crate::models::booking::{Booking, BookingPatch, NewBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, check_in_code, trainer_id, customer_user_id, customer_name, \
    customer_phone, customer_email, session_date, session_time, duration_minutes, \
    price_cents, status, payment_method, commission_cents, trainer_earnings_cents, \
    settled_at, has_been_reviewed, created_at, updated_at";

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings
                (check_in_code, trainer_id, customer_user_id, customer_name, customer_phone,
                 customer_email, session_date, session_time, duration_minutes, price_cents)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(&input.check_in_code)
            .bind(input.trainer_id)
            .bind(input.customer_user_id)
            .bind(&input.customer_name)
            .bind(&input.customer_phone)
            .bind(&input.customer_email)
            .bind(input.session_date)
            .bind(input.session_time)
            .bind(input.duration_minutes)
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a booking by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a booking by its front-desk check-in code.
    pub async fn find_by_check_in_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE check_in_code = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List all bookings, newest session first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings ORDER BY session_date DESC, session_time DESC"
        );
        sqlx::query_as::<_, Booking>(&query).fetch_all(pool).await
    }

    /// Update a booking. Only non-`None` fields in `patch` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &BookingPatch,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET
                status = COALESCE($2, status),
                payment_method = COALESCE($3, payment_method),
                commission_cents = COALESCE($4, commission_cents),
                trainer_earnings_cents = COALESCE($5, trainer_earnings_cents),
                settled_at = COALESCE($6, settled_at),
                has_been_reviewed = COALESCE($7, has_been_reviewed),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(&patch.status)
            .bind(&patch.payment_method)
            .bind(patch.commission_cents)
            .bind(patch.trainer_earnings_cents)
            .bind(patch.settled_at)
            .bind(patch.has_been_reviewed)
            .fetch_optional(pool)
            .await
    }

    /// Administrative hard delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

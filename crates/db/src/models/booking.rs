//! Booking entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use classfit_core::booking::{BookingParties, BookingStatus, PaymentMethod};
use classfit_core::types::{DbId, Timestamp};

/// Full booking row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: DbId,
    /// Short front-desk lookup code, unique per booking.
    pub check_in_code: String,
    pub trainer_id: DbId,
    /// Absent for guest bookings.
    pub customer_user_id: Option<DbId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub status: String,
    /// `cash` or `card`; set at settlement only.
    pub payment_method: Option<String>,
    /// Frozen at settlement; never recomputed.
    pub commission_cents: Option<i64>,
    pub trainer_earnings_cents: Option<i64>,
    pub settled_at: Option<Timestamp>,
    pub has_been_reviewed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// The typed lifecycle status, if the stored name is recognized.
    pub fn lifecycle_status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status)
    }

    /// The typed payment method, if settled.
    pub fn payment(&self) -> Option<PaymentMethod> {
        self.payment_method.as_deref().and_then(PaymentMethod::parse)
    }

    /// The two parties consulted by authorization checks.
    pub fn parties(&self) -> BookingParties {
        BookingParties {
            trainer_id: self.trainer_id,
            customer_user_id: self.customer_user_id,
        }
    }
}

/// DTO for creating a new booking. Status always starts at `pending`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub check_in_code: String,
    pub trainer_id: DbId,
    pub customer_user_id: Option<DbId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

/// Partial update for a booking row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub commission_cents: Option<i64>,
    pub trainer_earnings_cents: Option<i64>,
    pub settled_at: Option<Timestamp>,
    pub has_been_reviewed: Option<bool>,
}

impl BookingPatch {
    /// Patch that only moves the lifecycle status.
    pub fn status_only(status: BookingStatus) -> Self {
        BookingPatch {
            status: Some(status.as_str().to_string()),
            ..Default::default()
        }
    }
}

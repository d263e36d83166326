//! Settlement split: how a settled booking's price divides between the
//! gym's commission and the trainer's earnings.
//!
//! Prices are integer cents so the invariant
//! `commission_cents + trainer_earnings_cents == price_cents` holds exactly.
//! The commission is rounded half-up; the rounding remainder always lands in
//! the trainer's earnings. The split runs once, at settlement, and the
//! results are frozen on the booking row: later changes to a trainer's
//! commission rate never touch already-settled bookings.

use serde::Serialize;

/// Commission rate applied when a trainer has none configured, in percent.
pub const DEFAULT_COMMISSION_RATE: f64 = 25.0;

/// The frozen outcome of settling one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettlementSplit {
    /// Cents owed to the gym.
    pub commission_cents: i64,
    /// Cents owed to the trainer. Absorbs the rounding remainder.
    pub trainer_earnings_cents: i64,
}

/// Clamp a configured commission rate into [0, 100].
///
/// `None` and non-finite values fall back to [`DEFAULT_COMMISSION_RATE`].
pub fn effective_rate(commission_rate: Option<f64>) -> f64 {
    match commission_rate {
        Some(rate) if rate.is_finite() => rate.clamp(0.0, 100.0),
        _ => DEFAULT_COMMISSION_RATE,
    }
}

/// Split a non-negative price into commission and trainer earnings.
///
/// `commission_cents = half_up(price_cents * rate / 100)`, earnings are the
/// exact remainder.
pub fn split_price(price_cents: i64, commission_rate: Option<f64>) -> SettlementSplit {
    debug_assert!(price_cents >= 0, "prices are validated at creation");
    let rate = effective_rate(commission_rate);
    let commission_cents = half_up_cents(price_cents as f64 * rate / 100.0);
    SettlementSplit {
        commission_cents,
        trainer_earnings_cents: price_cents - commission_cents,
    }
}

/// Round a non-negative cent amount half-up to a whole cent.
fn half_up_cents(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

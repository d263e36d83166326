//! Booking lifecycle state machine and its authorization rules.
//!
//! A booking moves `pending -> confirmed -> trainer_completed -> completed`,
//! with cancellation possible from `pending` (trainer reject or customer
//! cancel) and `confirmed` (customer cancel only). `completed` and
//! `cancelled` are terminal; no event is accepted from either.
//!
//! [`BookingStatus::apply`] enforces the transition table and
//! [`authorize_event`] enforces who may fire each event. Both are pure so
//! the whole workflow is testable without a store.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::roles::{self, Actor};
use crate::types::DbId;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting the trainer's decision.
    Pending,
    /// Accepted by the trainer.
    Confirmed,
    /// Session held; awaiting front-desk settlement.
    TrainerCompleted,
    /// Settled and paid. Terminal.
    Completed,
    /// Rejected or cancelled. Terminal.
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::TrainerCompleted => "trainer_completed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a stored status name. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "trainer_completed" => Some(BookingStatus::TrainerCompleted),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses accept no further events.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Apply a lifecycle event, returning the next status.
    ///
    /// Any (status, event) pair outside the transition table fails with
    /// [`CoreError::InvalidTransition`]. This is also the idempotence guard
    /// for settlement: settling a `completed` booking is rejected here.
    pub fn apply(self, event: BookingEvent) -> CoreResult<BookingStatus> {
        let next = match (self, event) {
            (BookingStatus::Pending, BookingEvent::Confirm) => BookingStatus::Confirmed,
            (BookingStatus::Pending, BookingEvent::Reject) => BookingStatus::Cancelled,
            (BookingStatus::Pending, BookingEvent::Cancel) => BookingStatus::Cancelled,
            (BookingStatus::Confirmed, BookingEvent::Cancel) => BookingStatus::Cancelled,
            (BookingStatus::Confirmed, BookingEvent::MarkDone) => BookingStatus::TrainerCompleted,
            (BookingStatus::TrainerCompleted, BookingEvent::Settle) => BookingStatus::Completed,
            (from, event) => return Err(CoreError::InvalidTransition { from, event }),
        };
        Ok(next)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle events a booking can receive after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    /// Trainer approves a pending booking.
    Confirm,
    /// Trainer rejects a pending booking.
    Reject,
    /// Owning customer cancels (pending or confirmed).
    Cancel,
    /// Trainer marks the session as held.
    MarkDone,
    /// Front desk records the payment and freezes the commission split.
    Settle,
}

impl BookingEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingEvent::Confirm => "confirm",
            BookingEvent::Reject => "reject",
            BookingEvent::Cancel => "cancel",
            BookingEvent::MarkDone => "mark_done",
            BookingEvent::Settle => "settle",
        }
    }
}

impl std::fmt::Display for BookingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a settled session was paid for. Recorded once, at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentMethod> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

/// The two parties attached to a booking, used for authorization.
///
/// `customer_user_id` is `None` for guest bookings; guests cannot cancel
/// (only a trainer reject or an administrative delete removes their booking).
#[derive(Debug, Clone, Copy)]
pub struct BookingParties {
    pub trainer_id: DbId,
    pub customer_user_id: Option<DbId>,
}

/// Check that `actor` may fire `event` on a booking between `parties`.
///
/// Role membership must come from the latest user record. Failures are
/// [`CoreError::Forbidden`]; callers surface them without retrying.
pub fn authorize_event(actor: &Actor, parties: &BookingParties, event: BookingEvent) -> CoreResult<()> {
    let permitted = match event {
        BookingEvent::Confirm | BookingEvent::Reject | BookingEvent::MarkDone => {
            roles::can_act_as_trainer_for(actor, parties.trainer_id)
        }
        BookingEvent::Cancel => parties.customer_user_id == Some(actor.id),
        BookingEvent::Settle => roles::can_settle_payment(&actor.roles),
    };
    if permitted {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "actor {} may not {event} this booking",
            actor.id
        )))
    }
}

/// Administrative hard delete: permitted regardless of status, but only for
/// the same actor set that can manage roles.
pub fn authorize_delete(actor: &Actor) -> CoreResult<()> {
    if roles::can_manage_roles(&actor.roles) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "deleting bookings requires the management role".into(),
        ))
    }
}

/// The one mutation allowed after a terminal status: the owning customer may
/// flag a `completed` booking as reviewed, exactly once.
pub fn authorize_review(
    actor: &Actor,
    parties: &BookingParties,
    status: BookingStatus,
    already_reviewed: bool,
) -> CoreResult<()> {
    if parties.customer_user_id != Some(actor.id) {
        return Err(CoreError::Forbidden(
            "only the owning customer may review a booking".into(),
        ));
    }
    if status != BookingStatus::Completed {
        return Err(CoreError::InvalidTransition {
            from: status,
            // Reviews piggyback on settlement: they only exist past it.
            event: BookingEvent::Settle,
        });
    }
    if already_reviewed {
        return Err(CoreError::Validation(
            "booking has already been reviewed".into(),
        ));
    }
    Ok(())
}

/// Field validation for booking creation.
///
/// Availability is deliberately not checked: two customers may book the same
/// trainer at the same slot, matching the front-desk workflow where the
/// trainer resolves conflicts by confirming one and rejecting the other.
pub fn validate_new_booking(
    customer_name: &str,
    customer_phone: &str,
    duration_minutes: i32,
    price_cents: i64,
) -> CoreResult<()> {
    if customer_name.trim().is_empty() {
        return Err(CoreError::Validation("customer name is required".into()));
    }
    if customer_phone.trim().is_empty() {
        return Err(CoreError::Validation("customer phone is required".into()));
    }
    if duration_minutes <= 0 {
        return Err(CoreError::Validation(
            "duration must be a positive number of minutes".into(),
        ));
    }
    if price_cents < 0 {
        return Err(CoreError::Validation("price must not be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::Role;

    const ALL_STATUSES: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::TrainerCompleted,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    const ALL_EVENTS: [BookingEvent; 5] = [
        BookingEvent::Confirm,
        BookingEvent::Reject,
        BookingEvent::Cancel,
        BookingEvent::MarkDone,
        BookingEvent::Settle,
    ];

    /// Every (status, event) pair outside the table must fail, and every
    /// listed edge must succeed with the expected target.
    #[test]
    fn test_transition_table_is_exhaustive() {
        for from in ALL_STATUSES {
            for event in ALL_EVENTS {
                let expected = match (from, event) {
                    (BookingStatus::Pending, BookingEvent::Confirm) => {
                        Some(BookingStatus::Confirmed)
                    }
                    (BookingStatus::Pending, BookingEvent::Reject)
                    | (BookingStatus::Pending, BookingEvent::Cancel)
                    | (BookingStatus::Confirmed, BookingEvent::Cancel) => {
                        Some(BookingStatus::Cancelled)
                    }
                    (BookingStatus::Confirmed, BookingEvent::MarkDone) => {
                        Some(BookingStatus::TrainerCompleted)
                    }
                    (BookingStatus::TrainerCompleted, BookingEvent::Settle) => {
                        Some(BookingStatus::Completed)
                    }
                    _ => None,
                };

                match expected {
                    Some(next) => {
                        assert_eq!(from.apply(event).unwrap(), next, "{from} --{event}--> {next}")
                    }
                    None => assert_matches!(
                        from.apply(event),
                        Err(CoreError::InvalidTransition { .. }),
                        "{from} --{event}--> must be rejected"
                    ),
                }
            }
        }
    }

    #[test]
    fn test_terminal_statuses_accept_nothing() {
        for status in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(status.is_terminal());
            for event in ALL_EVENTS {
                assert!(status.apply(event).is_err());
            }
        }
    }

    #[test]
    fn test_settle_is_idempotence_guarded() {
        let settled = BookingStatus::TrainerCompleted
            .apply(BookingEvent::Settle)
            .unwrap();
        assert_eq!(settled, BookingStatus::Completed);
        assert_matches!(
            settled.apply(BookingEvent::Settle),
            Err(CoreError::InvalidTransition {
                from: BookingStatus::Completed,
                event: BookingEvent::Settle,
            })
        );
    }

    #[test]
    fn test_status_names_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("no_show"), None);
    }

    fn parties() -> BookingParties {
        BookingParties {
            trainer_id: 10,
            customer_user_id: Some(20),
        }
    }

    #[test]
    fn test_owning_trainer_may_confirm_reject_mark_done() {
        let trainer = Actor::new(10, vec![Role::Trainer]);
        for event in [BookingEvent::Confirm, BookingEvent::Reject, BookingEvent::MarkDone] {
            assert!(authorize_event(&trainer, &parties(), event).is_ok());
        }
    }

    #[test]
    fn test_other_trainer_is_forbidden() {
        let other = Actor::new(11, vec![Role::Trainer]);
        for event in [BookingEvent::Confirm, BookingEvent::Reject, BookingEvent::MarkDone] {
            assert_matches!(
                authorize_event(&other, &parties(), event),
                Err(CoreError::Forbidden(_))
            );
        }
    }

    #[test]
    fn test_only_owning_customer_may_cancel() {
        let owner = Actor::new(20, vec![Role::User]);
        assert!(authorize_event(&owner, &parties(), BookingEvent::Cancel).is_ok());

        let stranger = Actor::new(21, vec![Role::User]);
        assert_matches!(
            authorize_event(&stranger, &parties(), BookingEvent::Cancel),
            Err(CoreError::Forbidden(_))
        );

        // Guest bookings have no owner; nobody may customer-cancel them.
        let guest_parties = BookingParties {
            trainer_id: 10,
            customer_user_id: None,
        };
        assert_matches!(
            authorize_event(&owner, &guest_parties, BookingEvent::Cancel),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_customer_cannot_settle() {
        let customer = Actor::new(20, vec![Role::User]);
        assert_matches!(
            authorize_event(&customer, &parties(), BookingEvent::Settle),
            Err(CoreError::Forbidden(_))
        );
        let cashier = Actor::new(30, vec![Role::Cashier]);
        assert!(authorize_event(&cashier, &parties(), BookingEvent::Settle).is_ok());
    }

    #[test]
    fn test_hard_delete_requires_management() {
        assert!(authorize_delete(&Actor::new(1, vec![Role::Management])).is_ok());
        assert_matches!(
            authorize_delete(&Actor::new(1, vec![Role::Admin])),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_review_rules() {
        let owner = Actor::new(20, vec![Role::User]);

        assert!(authorize_review(&owner, &parties(), BookingStatus::Completed, false).is_ok());
        assert_matches!(
            authorize_review(&owner, &parties(), BookingStatus::Completed, true),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            authorize_review(&owner, &parties(), BookingStatus::Confirmed, false),
            Err(CoreError::InvalidTransition { .. })
        );

        let stranger = Actor::new(99, vec![Role::User]);
        assert_matches!(
            authorize_review(&stranger, &parties(), BookingStatus::Completed, false),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn test_new_booking_validation() {
        assert!(validate_new_booking("Ana", "+359 88 123", 60, 2000).is_ok());
        assert!(validate_new_booking("", "+359", 60, 2000).is_err());
        assert!(validate_new_booking("Ana", "  ", 60, 2000).is_err());
        assert!(validate_new_booking("Ana", "+359", 0, 2000).is_err());
        assert!(validate_new_booking("Ana", "+359", -30, 2000).is_err());
        assert!(validate_new_booking("Ana", "+359", 60, -1).is_err());
        // Free intro sessions are allowed.
        assert!(validate_new_booking("Ana", "+359", 30, 0).is_ok());
    }
}

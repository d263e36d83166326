//! Pure domain logic for the ClassFit booking platform.
//!
//! Everything in this crate is I/O-free: the role model and its
//! authorization predicates, the booking lifecycle state machine, the
//! settlement split calculator, check-in code generation, and the
//! account-management invariants. The `classfit-db` and `classfit-api`
//! crates layer persistence and HTTP on top.

pub mod account;
pub mod booking;
pub mod checkin;
pub mod error;
pub mod roles;
pub mod settlement;
pub mod types;

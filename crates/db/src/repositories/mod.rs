//! Postgres repositories. One unit struct per table, static methods over a
//! borrowed pool, shared column lists to keep SELECT/RETURNING in sync.

pub mod booking_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use user_repo::UserRepo;

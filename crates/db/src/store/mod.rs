//! The store abstraction behind every mutation.
//!
//! Handlers never talk to a pool or a file directly; they go through the
//! [`Store`] trait, which has two interchangeable strategies:
//!
//! - [`PgStore`]: each mutation is an isolated Postgres statement.
//! - [`LocalStore`]: no database configured; an in-memory collection
//!   serialized to a durable JSON file after every mutation.
//!
//! The contract for every mutation: on success the change is durably
//! recorded and a subsequent [`Store::refresh`] reflects it; on failure no
//! partial state is visible to other observers. All failures here are
//! infrastructure errors -- domain checks happen in `classfit-core` before
//! the store is touched, and are never retried, while callers may retry
//! [`StoreError`]s at their discretion.

mod local;
mod remote;

pub use local::{LocalStore, StoreChange};
pub use remote::PgStore;

use async_trait::async_trait;

use classfit_core::types::DbId;

use crate::models::booking::{Booking, BookingPatch, NewBooking};
use crate::models::user::{NewUser, User, UserPatch};

/// Infrastructure failure in the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("local store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("local store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A consistent post-mutation view of both collections.
///
/// Earlier in-memory copies are invalid once a new snapshot is taken;
/// dashboards re-render from this, never from stale rows.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub bookings: Vec<Booking>,
    pub users: Vec<User>,
}

/// Persistence collaborator consumed by the API layer.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_bookings(&self) -> StoreResult<Vec<Booking>>;
    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>>;
    async fn find_booking_by_code(&self, code: &str) -> StoreResult<Option<Booking>>;
    async fn insert_booking(&self, input: &NewBooking) -> StoreResult<Booking>;
    async fn update_booking(&self, id: DbId, patch: &BookingPatch) -> StoreResult<Option<Booking>>;
    async fn delete_booking(&self, id: DbId) -> StoreResult<bool>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn insert_user(&self, input: &NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: DbId, patch: &UserPatch) -> StoreResult<Option<User>>;
    async fn delete_user(&self, id: DbId) -> StoreResult<bool>;

    /// Re-read both collections and return the authoritative snapshot.
    async fn refresh(&self) -> StoreResult<Snapshot>;
}

//! Postgres-backed store strategy.

use async_trait::async_trait;

use classfit_core::types::DbId;

use crate::models::booking::{Booking, BookingPatch, NewBooking};
use crate::models::user::{NewUser, User, UserPatch};
use crate::repositories::{BookingRepo, UserRepo};
use crate::store::{Snapshot, Store, StoreResult};
use crate::DbPool;

/// Store strategy that delegates every operation to the repositories.
///
/// Durability comes from Postgres itself; every mutation is a single
/// isolated statement and concurrent writers are last-writer-wins, matching
/// the sequential-request execution model.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(BookingRepo::list(&self.pool).await?)
    }

    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_booking_by_code(&self, code: &str) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::find_by_check_in_code(&self.pool, code).await?)
    }

    async fn insert_booking(&self, input: &NewBooking) -> StoreResult<Booking> {
        Ok(BookingRepo::create(&self.pool, input).await?)
    }

    async fn update_booking(&self, id: DbId, patch: &BookingPatch) -> StoreResult<Option<Booking>> {
        Ok(BookingRepo::update(&self.pool, id, patch).await?)
    }

    async fn delete_booking(&self, id: DbId) -> StoreResult<bool> {
        Ok(BookingRepo::delete(&self.pool, id).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn insert_user(&self, input: &NewUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn update_user(&self, id: DbId, patch: &UserPatch) -> StoreResult<Option<User>> {
        Ok(UserRepo::update(&self.pool, id, patch).await?)
    }

    async fn delete_user(&self, id: DbId) -> StoreResult<bool> {
        Ok(UserRepo::delete(&self.pool, id).await?)
    }

    async fn refresh(&self) -> StoreResult<Snapshot> {
        let bookings = BookingRepo::list(&self.pool).await?;
        let users = UserRepo::list(&self.pool).await?;
        Ok(Snapshot { bookings, users })
    }
}

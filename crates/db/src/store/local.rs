//! Local-fallback store strategy.
//!
//! Used when no `DATABASE_URL` is configured. All rows live in memory and
//! are serialized to a JSON file after every mutation (temp file + rename,
//! so a crash never leaves a torn file). Reads and [`Store::refresh`] reload
//! the file first, so a second instance opened on the same path observes
//! mutations made by the first -- the moral equivalent of cross-tab storage
//! events in a browser. In-process observers can additionally subscribe to
//! a broadcast channel that fires after each mutation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use classfit_core::booking::BookingStatus;
use classfit_core::types::DbId;

use crate::models::booking::{Booking, BookingPatch, NewBooking};
use crate::models::user::{NewUser, User, UserPatch};
use crate::store::{Snapshot, Store, StoreResult};

/// Which collection a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Bookings,
    Users,
}

/// Everything the local store persists, including the id counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalState {
    next_booking_id: DbId,
    next_user_id: DbId,
    bookings: Vec<Booking>,
    users: Vec<User>,
}

impl Default for LocalState {
    fn default() -> Self {
        LocalState {
            next_booking_id: 1,
            next_user_id: 1,
            bookings: Vec::new(),
            users: Vec::new(),
        }
    }
}

/// File-backed store strategy for the no-database deployment mode.
pub struct LocalStore {
    path: PathBuf,
    state: RwLock<LocalState>,
    changes: broadcast::Sender<StoreChange>,
}

impl LocalStore {
    /// Open (or create) a local store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let state = load_from_disk(&path).await?;
        tracing::debug!(
            path = %path.display(),
            bookings = state.bookings.len(),
            users = state.users.len(),
            "opened local store"
        );
        let (changes, _) = broadcast::channel(64);
        Ok(LocalStore {
            path,
            state: RwLock::new(state),
            changes,
        })
    }

    /// Subscribe to mutation notifications from this instance.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Reload from disk, apply a mutation, persist, and notify.
    ///
    /// Reloading first means two instances on the same path do not clobber
    /// each other's earlier writes; conflicting edits to the same row remain
    /// last-writer-wins, as specified.
    async fn mutate<T>(
        &self,
        change: StoreChange,
        f: impl FnOnce(&mut LocalState) -> T,
    ) -> StoreResult<T> {
        let mut state = self.state.write().await;
        *state = load_from_disk(&self.path).await?;
        let out = f(&mut state);
        persist(&self.path, &state).await?;
        // No subscribers is fine.
        let _ = self.changes.send(change);
        Ok(out)
    }

    /// Reload from disk and read through the fresh state.
    async fn read<T>(&self, f: impl FnOnce(&LocalState) -> T) -> StoreResult<T> {
        let mut state = self.state.write().await;
        *state = load_from_disk(&self.path).await?;
        Ok(f(&state))
    }
}

async fn load_from_disk(path: &Path) -> StoreResult<LocalState> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LocalState::default()),
        Err(e) => Err(e.into()),
    }
}

async fn persist(path: &Path, state: &LocalState) -> StoreResult<()> {
    let tmp = path.with_extension("tmp");
    let bytes = serde_json::to_vec_pretty(state)?;
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn apply_booking_patch(row: &mut Booking, patch: &BookingPatch) {
    if let Some(status) = &patch.status {
        row.status = status.clone();
    }
    if let Some(method) = &patch.payment_method {
        row.payment_method = Some(method.clone());
    }
    if let Some(cents) = patch.commission_cents {
        row.commission_cents = Some(cents);
    }
    if let Some(cents) = patch.trainer_earnings_cents {
        row.trainer_earnings_cents = Some(cents);
    }
    if let Some(at) = patch.settled_at {
        row.settled_at = Some(at);
    }
    if let Some(reviewed) = patch.has_been_reviewed {
        row.has_been_reviewed = reviewed;
    }
    row.updated_at = Utc::now();
}

fn apply_user_patch(row: &mut User, patch: &UserPatch) {
    if let Some(name) = &patch.display_name {
        row.display_name = name.clone();
    }
    if let Some(phone) = &patch.phone {
        row.phone = Some(phone.clone());
    }
    if let Some(url) = &patch.image_url {
        row.image_url = Some(url.clone());
    }
    if let Some(bio) = &patch.bio {
        row.bio = Some(bio.clone());
    }
    if let Some(roles) = &patch.roles {
        row.roles = roles.clone();
    }
    if let Some(rate) = patch.commission_rate {
        row.commission_rate = Some(rate);
    }
    if let Some(languages) = &patch.languages {
        row.languages = languages.clone();
    }
    if let Some(dates) = &patch.unavailable_dates {
        row.unavailable_dates = dates.clone();
    }
    row.updated_at = Utc::now();
}

#[async_trait]
impl Store for LocalStore {
    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        self.read(|s| s.bookings.clone()).await
    }

    async fn find_booking(&self, id: DbId) -> StoreResult<Option<Booking>> {
        self.read(|s| s.bookings.iter().find(|b| b.id == id).cloned())
            .await
    }

    async fn find_booking_by_code(&self, code: &str) -> StoreResult<Option<Booking>> {
        self.read(|s| s.bookings.iter().find(|b| b.check_in_code == code).cloned())
            .await
    }

    async fn insert_booking(&self, input: &NewBooking) -> StoreResult<Booking> {
        let input = input.clone();
        self.mutate(StoreChange::Bookings, move |state| {
            let now = Utc::now();
            let row = Booking {
                id: state.next_booking_id,
                check_in_code: input.check_in_code,
                trainer_id: input.trainer_id,
                customer_user_id: input.customer_user_id,
                customer_name: input.customer_name,
                customer_phone: input.customer_phone,
                customer_email: input.customer_email,
                session_date: input.session_date,
                session_time: input.session_time,
                duration_minutes: input.duration_minutes,
                price_cents: input.price_cents,
                status: BookingStatus::Pending.as_str().to_string(),
                payment_method: None,
                commission_cents: None,
                trainer_earnings_cents: None,
                settled_at: None,
                has_been_reviewed: false,
                created_at: now,
                updated_at: now,
            };
            state.next_booking_id += 1;
            state.bookings.push(row.clone());
            row
        })
        .await
    }

    async fn update_booking(&self, id: DbId, patch: &BookingPatch) -> StoreResult<Option<Booking>> {
        let patch = patch.clone();
        self.mutate(StoreChange::Bookings, move |state| {
            state.bookings.iter_mut().find(|b| b.id == id).map(|row| {
                apply_booking_patch(row, &patch);
                row.clone()
            })
        })
        .await
    }

    async fn delete_booking(&self, id: DbId) -> StoreResult<bool> {
        self.mutate(StoreChange::Bookings, move |state| {
            let before = state.bookings.len();
            state.bookings.retain(|b| b.id != id);
            state.bookings.len() < before
        })
        .await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.read(|s| s.users.clone()).await
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        self.read(|s| s.users.iter().find(|u| u.id == id).cloned())
            .await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.read(|s| s.users.iter().find(|u| u.email == email).cloned())
            .await
    }

    async fn insert_user(&self, input: &NewUser) -> StoreResult<User> {
        let input = input.clone();
        self.mutate(StoreChange::Users, move |state| {
            let now = Utc::now();
            let row = User {
                id: state.next_user_id,
                display_name: input.display_name,
                email: input.email,
                password_hash: input.password_hash,
                phone: input.phone,
                image_url: None,
                bio: input.bio,
                roles: input.roles,
                commission_rate: input.commission_rate,
                languages: input.languages,
                unavailable_dates: Vec::new(),
                created_at: now,
                updated_at: now,
            };
            state.next_user_id += 1;
            state.users.push(row.clone());
            row
        })
        .await
    }

    async fn update_user(&self, id: DbId, patch: &UserPatch) -> StoreResult<Option<User>> {
        let patch = patch.clone();
        self.mutate(StoreChange::Users, move |state| {
            state.users.iter_mut().find(|u| u.id == id).map(|row| {
                apply_user_patch(row, &patch);
                row.clone()
            })
        })
        .await
    }

    async fn delete_user(&self, id: DbId) -> StoreResult<bool> {
        self.mutate(StoreChange::Users, move |state| {
            let before = state.users.len();
            state.users.retain(|u| u.id != id);
            state.users.len() < before
        })
        .await
    }

    async fn refresh(&self) -> StoreResult<Snapshot> {
        self.read(|s| Snapshot {
            bookings: s.bookings.clone(),
            users: s.users.clone(),
        })
        .await
    }
}

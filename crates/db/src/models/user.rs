//! User entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use classfit_core::roles::{Actor, Role};
use classfit_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output. (The Serialize
/// derive exists for the local-store's durable file, which holds credential
/// secrets just like the database does.)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    /// Stored role names; an account may hold several at once.
    pub roles: Vec<String>,
    /// Percentage owed to the gym; only meaningful for trainer accounts.
    pub commission_rate: Option<f64>,
    pub languages: Vec<String>,
    /// Dates the trainer has marked themselves unavailable.
    pub unavailable_dates: Vec<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The user's role set, ignoring any unknown stored names.
    pub fn role_set(&self) -> Vec<Role> {
        self.roles.iter().filter_map(|s| Role::parse(s)).collect()
    }

    /// The user as an authorization actor with live roles.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role_set())
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub roles: Vec<String>,
    pub commission_rate: Option<f64>,
    pub languages: Vec<String>,
    pub unavailable_dates: Vec<NaiveDate>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            display_name: u.display_name,
            email: u.email,
            phone: u.phone,
            image_url: u.image_url,
            bio: u.bio,
            roles: u.roles,
            commission_rate: u.commission_rate,
            languages: u.languages,
            unavailable_dates: u.unavailable_dates,
            created_at: u.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub roles: Vec<String>,
    pub commission_rate: Option<f64>,
    pub languages: Vec<String>,
}

/// Partial update for a user row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub roles: Option<Vec<String>>,
    pub commission_rate: Option<f64>,
    pub languages: Option<Vec<String>>,
    pub unavailable_dates: Option<Vec<NaiveDate>>,
}

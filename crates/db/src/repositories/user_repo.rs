//! Repository for the `users` table.

use sqlx::PgPool;

use classfit_core::types::DbId;

use crate::models::user::{NewUser, User, UserPatch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, display_name, email, password_hash, phone, image_url, bio, \
    roles, commission_rate, languages, unavailable_dates, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (display_name, email, password_hash, phone, bio, roles, commission_rate, languages)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.display_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.phone)
            .bind(&input.bio)
            .bind(&input.roles)
            .bind(input.commission_rate)
            .bind(&input.languages)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user. Only non-`None` fields in `patch` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &UserPatch,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                phone = COALESCE($3, phone),
                image_url = COALESCE($4, image_url),
                bio = COALESCE($5, bio),
                roles = COALESCE($6, roles),
                commission_rate = COALESCE($7, commission_rate),
                languages = COALESCE($8, languages),
                unavailable_dates = COALESCE($9, unavailable_dates),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&patch.display_name)
            .bind(&patch.phone)
            .bind(&patch.image_url)
            .bind(&patch.bio)
            .bind(&patch.roles)
            .bind(patch.commission_rate)
            .bind(&patch.languages)
            .bind(&patch.unavailable_dates)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a user. Returns `true` if a row was removed.
    ///
    /// Management accounts must be rejected by the caller beforehand via
    /// `classfit_core::account::validate_user_delete`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

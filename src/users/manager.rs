/// User service implementation using runtime queries
use crate::{
    auth::{PasswordHasher, TokenIssuer},
    db::models::User,
    error::{ApiError, ApiResult},
    users::UpdateUserRequest,
};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Returns true for the SQLite unique-constraint violation on an insert or
/// update. The unique index on `users.email` is the authoritative duplicate
/// signal; the pre-check in `register` is advisory only.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(_)) && err.to_string().contains("UNIQUE")
}

/// User service: owns the user lifecycle and orchestrates the password
/// hasher and token issuer for registration and login.
pub struct UserService {
    db: SqlitePool,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
    /// Verified against when login hits an unknown email, so that path costs
    /// the same argon2 work as a wrong password and stays indistinguishable.
    dummy_hash: String,
}

impl UserService {
    /// Create a new user service
    pub fn new(db: SqlitePool, tokens: Arc<TokenIssuer>) -> ApiResult<Self> {
        let hasher = PasswordHasher;
        let dummy_hash = hasher.hash("decoy-password-for-unknown-emails")?;

        Ok(Self {
            db,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Register a new user
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<bool>,
    ) -> ApiResult<User> {
        if self.email_exists(email).await? {
            return Err(ApiError::DuplicateEmail(email.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash,
            role: role.unwrap_or(true),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // Concurrent registration won the race between check and insert
                ApiError::DuplicateEmail(email.to_string())
            } else {
                ApiError::Database(e)
            }
        })?;

        tracing::info!(user_id = %user.id, "registered user");

        Ok(user)
    }

    /// Authenticate and issue a token
    ///
    /// Unknown email and wrong password are indistinguishable to the caller:
    /// same error, and both paths perform exactly one hash verification.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let Some(user) = user else {
            let _ = self.hasher.verify(password, &self.dummy_hash)?;
            return Err(ApiError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        self.tokens.issue(&user.id, &user.email)
    }

    /// Apply a partial update; only fields present in the request change.
    /// A password field is re-hashed, never stored verbatim.
    pub async fn update(&self, id: &str, update: UpdateUserRequest) -> ApiResult<User> {
        let current = self.find_by_id(id).await?;

        let password_hash = match update.password {
            Some(ref plaintext) => self.hasher.hash(plaintext)?,
            None => current.password_hash,
        };

        let updated = User {
            id: current.id,
            email: update.email.unwrap_or(current.email),
            password_hash,
            role: update.role.unwrap_or(current.role),
            created_at: current.created_at,
        };

        sqlx::query("UPDATE users SET email = ?1, password_hash = ?2, role = ?3 WHERE id = ?4")
            .bind(&updated.email)
            .bind(&updated.password_hash)
            .bind(updated.role)
            .bind(&updated.id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::DuplicateEmail(updated.email.clone())
                } else {
                    ApiError::Database(e)
                }
            })?;

        Ok(updated)
    }

    /// Delete a user and return the removed record
    ///
    /// The user's timers are deliberately left in place; referential
    /// integrity is only checked at timer creation time.
    pub async fn delete(&self, id: &str) -> ApiResult<User> {
        let user = self.find_by_id(id).await?;

        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        tracing::info!(user_id = %id, "deleted user");

        Ok(user)
    }

    /// List every user
    pub async fn find_all(&self) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users",
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(users)
    }

    /// Get a user by id
    pub async fn find_by_id(&self, id: &str) -> ApiResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("No user with id {}", id)))
    }

    /// Cheap existence probe for the registration pre-check
    async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        let row = sqlx::query("SELECT id FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(row.is_some())
    }
}

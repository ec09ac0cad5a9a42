/// Timer service implementation using runtime queries
use crate::{
    db::models::Timer,
    error::{ApiError, ApiResult},
    users::UserService,
};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Leaderboard size when the caller does not specify one
pub const DEFAULT_BEST_LIMIT: i64 = 10;

/// Timer service: records elapsed durations and answers ranking queries.
/// Referential integrity against the user set is enforced here at creation
/// time only; deleting a user later does not cascade.
pub struct TimerService {
    db: SqlitePool,
    users: Arc<UserService>,
}

impl TimerService {
    /// Create a new timer service
    pub fn new(db: SqlitePool, users: Arc<UserService>) -> Self {
        Self { db, users }
    }

    /// Record a timer for a user
    ///
    /// The elapsed duration is computed as `click - start`; a click before
    /// the start is inconsistent input and is rejected rather than stored.
    pub async fn create(
        &self,
        user_id: &str,
        start_timestamp: i64,
        click_timestamp: i64,
    ) -> ApiResult<Timer> {
        self.require_user(user_id).await?;

        if click_timestamp < start_timestamp {
            return Err(ApiError::InvalidTimerInput(
                "click timestamp precedes start timestamp".to_string(),
            ));
        }

        // Checked: extreme timestamps (e.g. start near i64::MIN) would wrap
        // the difference negative even with the ordering guard above
        let elapsed_ms = click_timestamp
            .checked_sub(start_timestamp)
            .ok_or_else(|| {
                ApiError::InvalidTimerInput("timestamp difference out of range".to_string())
            })?;

        let timer = Timer {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            elapsed_ms,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO timers (id, user_id, elapsed_ms, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&timer.id)
        .bind(&timer.user_id)
        .bind(timer.elapsed_ms)
        .bind(timer.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        tracing::debug!(user_id = %user_id, elapsed_ms = timer.elapsed_ms, "recorded timer");

        Ok(timer)
    }

    /// List a user's timers in storage order
    pub async fn list_for_user(&self, user_id: &str) -> ApiResult<Vec<Timer>> {
        self.require_user(user_id).await?;

        let timers = sqlx::query_as::<_, Timer>(
            "SELECT id, user_id, elapsed_ms, created_at FROM timers WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(timers)
    }

    /// Best-N timers for a user, lowest elapsed first
    ///
    /// Ties are broken by insertion order (rowid), so the sort is stable.
    pub async fn best_for_user(&self, user_id: &str, limit: i64) -> ApiResult<Vec<Timer>> {
        self.require_user(user_id).await?;

        let timers = sqlx::query_as::<_, Timer>(
            "SELECT id, user_id, elapsed_ms, created_at FROM timers
             WHERE user_id = ?1
             ORDER BY elapsed_ms ASC, rowid ASC
             LIMIT ?2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(timers)
    }

    /// Every timer across all users, in storage order
    pub async fn list_all(&self) -> ApiResult<Vec<Timer>> {
        let timers =
            sqlx::query_as::<_, Timer>("SELECT id, user_id, elapsed_ms, created_at FROM timers")
                .fetch_all(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(timers)
    }

    /// Resolve the user or fail with `UserNotFound`
    async fn require_user(&self, user_id: &str) -> ApiResult<()> {
        match self.users.find_by_id(user_id).await {
            Ok(_) => Ok(()),
            Err(ApiError::NotFound(_)) => Err(ApiError::UserNotFound),
            Err(e) => Err(e),
        }
    }
}

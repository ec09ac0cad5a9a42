/// Database models for users and timers
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    /// Account role flag; `true` is a standard account (source convention)
    pub role: bool,
    pub created_at: DateTime<Utc>,
}

/// Timer record in the database
///
/// `elapsed_ms` is derived once at creation and never mutated; timers are
/// immutable after insert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    pub user_id: String,
    pub elapsed_ms: i64,
    pub created_at: DateTime<Utc>,
}

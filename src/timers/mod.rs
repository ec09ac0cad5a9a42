/// Timer recording and leaderboard queries
mod manager;

pub use manager::{TimerService, DEFAULT_BEST_LIMIT};

use serde::{Deserialize, Serialize};

/// Timer creation request: raw timestamps in milliseconds since epoch.
/// The elapsed duration is derived server-side, never supplied directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimerRequest {
    pub start_timestamp: i64,
    pub click_timestamp: i64,
}

/// Query parameters for the best-N leaderboard
#[derive(Debug, Clone, Deserialize)]
pub struct BestTimersParams {
    pub limit: Option<i64>,
}

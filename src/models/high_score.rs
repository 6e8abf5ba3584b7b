use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single stored best score
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HighScoreRecord {
    pub score: f64,
    pub achieved_at: DateTime<Utc>,
}

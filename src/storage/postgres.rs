use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::{HighScoreOutcome, HighScoreStore};
use crate::db::queries;

/// High score kept in a single-row Postgres table
pub struct PgHighScoreStore {
    pool: PgPool,
}

impl PgHighScoreStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HighScoreStore for PgHighScoreStore {
    async fn get_high_score(&self) -> Result<f64> {
        let record = queries::get_high_score(&self.pool)
            .await
            .context("Failed to query high score")?;
        Ok(record.map(|r| r.score).unwrap_or(0.0))
    }

    async fn submit_score(&self, score: f64) -> Result<HighScoreOutcome> {
        // An empty table counts as a best of zero
        if score <= 0.0 {
            return Ok(HighScoreOutcome::unbeaten(self.get_high_score().await?));
        }
        let written = queries::submit_high_score(&self.pool, score)
            .await
            .context("Failed to store high score")?;
        if written {
            return Ok(HighScoreOutcome::new_best(score));
        }
        Ok(HighScoreOutcome::unbeaten(self.get_high_score().await?))
    }
}

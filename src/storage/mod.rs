use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

pub mod postgres;

pub use postgres::PgHighScoreStore;

/// Where the best score survives between games
#[async_trait]
pub trait HighScoreStore: Send + Sync {
    async fn get_high_score(&self) -> Result<f64>;

    /// Store `score` if it beats the current best. The comparison and the
    /// write happen as one step, so concurrent submissions never lower it.
    async fn submit_score(&self, score: f64) -> Result<HighScoreOutcome>;
}

/// Keeps the high score for the life of the process
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    score: RwLock<f64>,
}

#[async_trait]
impl HighScoreStore for MemoryHighScoreStore {
    async fn get_high_score(&self) -> Result<f64> {
        Ok(*self.score.read().await)
    }

    async fn submit_score(&self, score: f64) -> Result<HighScoreOutcome> {
        let mut stored = self.score.write().await;
        if score > *stored {
            *stored = score;
            return Ok(HighScoreOutcome::new_best(score));
        }
        Ok(HighScoreOutcome::unbeaten(*stored))
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HighScoreOutcome {
    pub high_score: f64,
    pub is_new_high_score: bool,
}

impl HighScoreOutcome {
    pub fn new_best(score: f64) -> Self {
        Self {
            high_score: score,
            is_new_high_score: true,
        }
    }

    pub fn unbeaten(high_score: f64) -> Self {
        Self {
            high_score,
            is_new_high_score: false,
        }
    }
}

/// Offer a finished game's score to the store. Store failures are logged,
/// never returned.
pub async fn record_final_score(store: &dyn HighScoreStore, score: f64) -> HighScoreOutcome {
    match store.submit_score(score).await {
        Ok(outcome) => {
            if outcome.is_new_high_score {
                tracing::info!("New high score: {}", score);
            }
            outcome
        }
        Err(e) => {
            tracing::warn!("Failed to record high score {}: {:#}", score, e);
            HighScoreOutcome::unbeaten(score)
        }
    }
}

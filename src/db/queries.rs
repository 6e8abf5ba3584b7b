use sqlx::{PgPool, Result};

use crate::models::HighScoreRecord;

/// Row id of the only high score entry
const HIGH_SCORE_ROW: i32 = 1;

pub async fn get_high_score(pool: &PgPool) -> Result<Option<HighScoreRecord>> {
    sqlx::query_as::<_, HighScoreRecord>(
        "SELECT score, achieved_at FROM high_score WHERE id = $1",
    )
    .bind(HIGH_SCORE_ROW)
    .fetch_optional(pool)
    .await
}

/// Write `score` only if it beats the stored one. Returns whether it did.
pub async fn submit_high_score(pool: &PgPool, score: f64) -> Result<bool> {
    let written = sqlx::query_scalar::<_, f64>(
        r#"
        INSERT INTO high_score (id, score, achieved_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (id)
        DO UPDATE SET
            score = EXCLUDED.score,
            achieved_at = NOW()
        WHERE high_score.score < EXCLUDED.score
        RETURNING score
        "#,
    )
    .bind(HIGH_SCORE_ROW)
    .bind(score)
    .fetch_optional(pool)
    .await?;

    if written.is_some() {
        tracing::debug!("Stored high score {}", score);
    }
    Ok(written.is_some())
}

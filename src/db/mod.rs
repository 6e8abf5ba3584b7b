use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

pub mod queries;

/// Connect to Postgres and bring the schema up to date
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

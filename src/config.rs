use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Without a URL the high score lives in memory
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub dictionary_path: String,
    pub rows: usize,
    pub cols: usize,
    /// How often a connected session's clock is advanced
    pub frame_interval_ms: u64,
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            bail!(
                "grid must be at least 1x1, got {}x{}",
                self.cols,
                self.rows
            );
        }
        if self.frame_interval_ms == 0 {
            bail!("FRAME_INTERVAL_MS must be greater than zero");
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        };

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "./frontend".to_string()),
        };

        let game = GameConfig {
            dictionary_path: env::var("DICTIONARY_PATH")
                .unwrap_or_else(|_| "./dictionary.txt".to_string()),
            rows: env::var("GRID_ROWS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("GRID_ROWS must be a number")?,
            cols: env::var("GRID_COLS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("GRID_COLS must be a number")?,
            frame_interval_ms: env::var("FRAME_INTERVAL_MS")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("FRAME_INTERVAL_MS must be a number")?,
        };
        game.validate()?;

        Ok(Config {
            database,
            server,
            game,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

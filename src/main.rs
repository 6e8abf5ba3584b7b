mod audio;
mod config;
mod db;
mod dictionary;
mod error;
mod game;
mod models;
mod routes;
mod storage;
mod utils;
mod websocket;

use std::{sync::Arc, time::Instant};

use anyhow::Result;
use axum::{routing::get, Router};
use config::Config;
use dashmap::DashMap;
use dictionary::Dictionary;
use storage::{HighScoreStore, MemoryHighScoreStore, PgHighScoreStore};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Bookkeeping for one connected game session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub connected_at: Instant,
}

impl SessionInfo {
    pub fn new() -> Self {
        Self {
            connected_at: Instant::now(),
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub dictionary: Arc<Dictionary>,
    pub high_scores: Arc<dyn HighScoreStore>,
    pub active_sessions: DashMap<Uuid, SessionInfo>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "letter_drop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Letter Drop server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load dictionary
    let dictionary = match Dictionary::load(&config.game.dictionary_path).await {
        Ok(dict) => {
            tracing::info!("Dictionary loaded successfully");
            dict
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load dictionary from {}: {}. Using the built-in word list.",
                config.game.dictionary_path,
                e
            );
            Dictionary::builtin()
        }
    };
    if dictionary.is_empty() {
        tracing::warn!("Dictionary has no playable words, every submission will be rejected");
    } else {
        tracing::info!("{} playable words", dictionary.len());
    }

    // High score storage
    let high_scores: Arc<dyn HighScoreStore> = match &config.database.url {
        Some(url) => {
            let pool = db::connect(url, config.database.max_connections).await?;
            Arc::new(PgHighScoreStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, high score will not survive a restart");
            Arc::new(MemoryHighScoreStore::default())
        }
    };

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
        dictionary: Arc::new(dictionary),
        high_scores,
        active_sessions: DashMap::new(),
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(&config.server.frontend_dir);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Game frontend: http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

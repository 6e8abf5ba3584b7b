use serde::{Deserialize, Serialize};

use crate::{
    audio::{MusicState, SoundEvent},
    models::{Notification, SessionSnapshot},
};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// `-1` for left, `1` for right
    MovePiece {
        direction: i32,
    },
    HardDrop,
    ActivateCell {
        x: usize,
        y: usize,
    },
    SetPaused {
        paused: bool,
    },
    Reset,
    SetMuted {
        muted: bool,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State {
        snapshot: SessionSnapshot,
    },
    Notification {
        notification: Notification,
    },
    Sound {
        event: SoundEvent,
    },
    /// Sent whenever the background music should change
    Music {
        state: MusicState,
    },
    LevelUp {
        level: u32,
    },
    GameOver {
        score: f64,
        high_score: f64,
        is_new_high_score: bool,
    },
    Error {
        message: String,
    },
}

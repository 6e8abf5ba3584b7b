use serde::{Deserialize, Serialize};

/// A grid coordinate. `x` is the column, `y` the row counted from the top.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Lateral move requested for the falling letter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a `-1` / `+1` delta coming from the UI onto a direction
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Apply this direction to a column, returning `None` when it would leave
    /// the left edge. The right edge is checked by the caller against the grid.
    pub fn apply(self, x: usize) -> Option<usize> {
        match self {
            Direction::Left => x.checked_sub(1),
            Direction::Right => x.checked_add(1),
        }
    }
}

/// The single letter currently falling under player control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivePiece {
    pub letter: char,
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    WordCleared,
    WordInvalid,
}

/// Transient message shown by the UI after a word submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
}

impl Notification {
    pub fn word_cleared(word: &str, points: f64) -> Self {
        Self {
            kind: NotificationKind::WordCleared,
            text: format!("{}! +{}", word.to_uppercase(), points.round()),
            points: Some(points),
        }
    }

    pub fn word_invalid(word: &str) -> Self {
        Self {
            kind: NotificationKind::WordInvalid,
            text: format!("{} is not a word", word.to_uppercase()),
            points: None,
        }
    }
}

/// Read-only view of a session handed to the renderer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells, `None` for empty
    pub grid: Vec<Vec<Option<char>>>,
    pub score: f64,
    pub level: u32,
    pub next_letter: char,
    pub active_piece: Option<ActivePiece>,
    pub selection: Vec<Position>,
    pub paused: bool,
    pub game_over: bool,
    pub notifications: Vec<Notification>,
    pub tick_interval_ms: u64,
}

/// Things that happened inside a session which the host has to act on
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Notification(Notification),
    LevelUp { level: u32 },
    GameOver { score: f64 },
}

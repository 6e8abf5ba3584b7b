pub mod game;
pub mod high_score;

pub use game::{
    // Board and piece types
    ActivePiece, Direction, Position,
    // Values handed to the UI
    Notification, SessionEvent, SessionSnapshot,
};
pub use high_score::HighScoreRecord;

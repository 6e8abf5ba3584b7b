// Game engine modules

pub mod clock;
pub mod generator;
pub mod grid;
pub mod piece;
pub mod scorer;
pub mod selection;
pub mod session;
pub mod validator;

pub use generator::LetterGenerator;
pub use grid::Grid;
pub use scorer::Scorer;
pub use session::GameSession;

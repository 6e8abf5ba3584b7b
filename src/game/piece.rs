use crate::{
    game::Grid,
    models::{ActivePiece, Direction},
};

/// Where the falling letter is in its life cycle. Landing is not a resting
/// state: a landed piece is handed back to the caller and the controller is
/// immediately back at `NoPiece`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceState {
    NoPiece,
    Falling(ActivePiece),
}

/// Result of advancing the falling letter by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing was falling
    Idle,
    /// Moved down one row
    Fell,
    /// Blocked below. `top_out` is set when the piece never left row 0.
    Landed { piece: ActivePiece, top_out: bool },
}

#[derive(Debug, Clone)]
pub struct PieceController {
    state: PieceState,
}

impl Default for PieceController {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceController {
    pub fn new() -> Self {
        Self {
            state: PieceState::NoPiece,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PieceState {
        self.state
    }

    pub fn active(&self) -> Option<ActivePiece> {
        match self.state {
            PieceState::Falling(piece) => Some(piece),
            PieceState::NoPiece => None,
        }
    }

    /// Start `letter` falling from the top of the middle column
    pub fn spawn(&mut self, letter: char, grid: &Grid) -> ActivePiece {
        debug_assert!(
            self.state == PieceState::NoPiece,
            "spawned while a piece is still falling"
        );
        let piece = ActivePiece {
            letter,
            x: grid.cols() / 2,
            y: 0,
        };
        self.state = PieceState::Falling(piece);
        piece
    }

    /// Move down one row, or land when the cell below is off the grid or taken
    pub fn step(&mut self, grid: &Grid) -> StepOutcome {
        let PieceState::Falling(piece) = self.state else {
            return StepOutcome::Idle;
        };

        let below = piece.y + 1;
        if below < grid.rows() && grid.is_empty(piece.x, below) {
            self.state = PieceState::Falling(ActivePiece { y: below, ..piece });
            StepOutcome::Fell
        } else {
            self.state = PieceState::NoPiece;
            StepOutcome::Landed {
                piece,
                top_out: piece.y == 0,
            }
        }
    }

    /// Slide one column if the target cell in the current row is free.
    /// Returns whether the piece moved.
    pub fn shift(&mut self, direction: Direction, grid: &Grid) -> bool {
        let PieceState::Falling(piece) = self.state else {
            return false;
        };

        match direction.apply(piece.x) {
            Some(x) if grid.in_bounds(x, piece.y) && grid.is_empty(x, piece.y) => {
                self.state = PieceState::Falling(ActivePiece { x, ..piece });
                true
            }
            _ => false,
        }
    }

    /// Drop straight to the lowest free row of the column without landing.
    /// The next `step` sees it blocked and lands it.
    pub fn hard_drop(&mut self, grid: &Grid) -> bool {
        let PieceState::Falling(piece) = self.state else {
            return false;
        };

        let mut y = piece.y;
        while y + 1 < grid.rows() && grid.is_empty(piece.x, y + 1) {
            y += 1;
        }

        self.state = PieceState::Falling(ActivePiece { y, ..piece });
        y != piece.y
    }

    pub fn clear(&mut self) {
        self.state = PieceState::NoPiece;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_in_middle_column() {
        let grid = Grid::new(8, 8);
        let mut controller = PieceController::new();

        let piece = controller.spawn('A', &grid);
        assert_eq!((piece.x, piece.y), (4, 0));

        let odd = Grid::new(5, 7);
        let mut controller = PieceController::new();
        assert_eq!(controller.spawn('B', &odd).x, 3);
    }

    #[test]
    fn test_step_falls_then_lands_on_floor() {
        let grid = Grid::new(3, 3);
        let mut controller = PieceController::new();
        controller.spawn('E', &grid);

        assert_eq!(controller.step(&grid), StepOutcome::Fell);
        assert_eq!(controller.step(&grid), StepOutcome::Fell);
        assert_eq!(controller.active().map(|p| p.y), Some(2));

        let outcome = controller.step(&grid);
        assert_eq!(
            outcome,
            StepOutcome::Landed {
                piece: ActivePiece {
                    letter: 'E',
                    x: 1,
                    y: 2
                },
                top_out: false
            }
        );
        assert_eq!(controller.state(), PieceState::NoPiece);
        assert_eq!(controller.step(&grid), StepOutcome::Idle);
    }

    #[test]
    fn test_step_lands_on_stack() {
        let grid = Grid::from_rows(&[
            "...", //
            "...", //
            ".T.",
        ]);
        let mut controller = PieceController::new();
        controller.spawn('A', &grid);

        assert_eq!(controller.step(&grid), StepOutcome::Fell);
        assert!(matches!(
            controller.step(&grid),
            StepOutcome::Landed { piece, top_out: false } if piece.y == 1
        ));
    }

    #[test]
    fn test_blocked_at_row_zero_is_top_out() {
        let grid = Grid::from_rows(&[
            "...", //
            ".X.", //
            ".Y.",
        ]);
        let mut controller = PieceController::new();
        controller.spawn('A', &grid);

        assert!(matches!(
            controller.step(&grid),
            StepOutcome::Landed { top_out: true, .. }
        ));
    }

    #[test]
    fn test_shift_respects_edges_and_occupied_cells() {
        let grid = Grid::from_rows(&[
            "....", //
            "Q...", //
            "ZZ..",
        ]);
        let mut controller = PieceController::new();
        controller.spawn('A', &grid); // x = 2

        assert!(controller.shift(Direction::Left, &grid));
        assert!(controller.shift(Direction::Left, &grid));
        assert_eq!(controller.active().map(|p| p.x), Some(0));
        // Left edge
        assert!(!controller.shift(Direction::Left, &grid));

        assert_eq!(
            controller.step(&grid),
            StepOutcome::Landed {
                piece: ActivePiece {
                    letter: 'A',
                    x: 0,
                    y: 0
                },
                top_out: true,
            }
        );

        let mut controller = PieceController::new();
        controller.spawn('B', &grid);
        controller.step(&grid); // row 1, x = 2
        assert!(controller.shift(Direction::Left, &grid));
        // Q occupies (0, 1)
        assert!(!controller.shift(Direction::Left, &grid));
        assert!(controller.shift(Direction::Right, &grid));
        assert!(controller.shift(Direction::Right, &grid));
        // Right edge
        assert!(!controller.shift(Direction::Right, &grid));
        assert_eq!(controller.active().map(|p| (p.x, p.y)), Some((3, 1)));
    }

    #[test]
    fn test_hard_drop_moves_to_rest_without_landing() {
        let grid = Grid::from_rows(&[
            "...", //
            "...", //
            "...", //
            ".K.",
        ]);
        let mut controller = PieceController::new();
        controller.spawn('O', &grid);

        assert!(controller.hard_drop(&grid));
        assert_eq!(controller.active().map(|p| p.y), Some(2));
        // Still falling until the next step confirms it's blocked
        assert!(matches!(controller.state(), PieceState::Falling(_)));
        assert!(!controller.hard_drop(&grid));

        assert!(matches!(
            controller.step(&grid),
            StepOutcome::Landed { piece, top_out: false } if piece.y == 2
        ));
    }

    #[test]
    fn test_moves_without_piece_are_noops() {
        let grid = Grid::new(4, 4);
        let mut controller = PieceController::new();

        assert!(!controller.shift(Direction::Right, &grid));
        assert!(!controller.hard_drop(&grid));
        assert_eq!(controller.step(&grid), StepOutcome::Idle);
    }
}

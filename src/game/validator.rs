use crate::{dictionary::Dictionary, game::Grid, models::Position};
use std::{collections::HashSet, sync::Arc};

/// Shortest word a selection may spell
pub const MIN_WORD_LENGTH: usize = 3;

pub struct WordValidator {
    dictionary: Arc<Dictionary>,
}

impl WordValidator {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self { dictionary }
    }

    /// Check if word is long enough and exists in the dictionary
    pub fn is_valid_word(&self, word: &str) -> bool {
        word.chars().count() >= MIN_WORD_LENGTH && self.dictionary.contains(word)
    }

    /// Validate that positions form a valid path of settled letters
    pub fn is_valid_path(&self, grid: &Grid, positions: &[Position]) -> bool {
        if positions.is_empty() {
            return false;
        }

        // Check that all positions are within bounds and hold a letter
        if !positions
            .iter()
            .all(|pos| grid.in_bounds(pos.x, pos.y) && !grid.is_empty(pos.x, pos.y))
        {
            return false;
        }

        // Check that each position is adjacent to the previous one
        for window in positions.windows(2) {
            if !are_adjacent(&window[0], &window[1]) {
                return false;
            }
        }

        // Check that no position is used twice
        let unique_positions: HashSet<_> = positions.iter().collect();
        unique_positions.len() == positions.len()
    }

    /// Extract the lowercase word spelled along the path, `None` if any cell
    /// is off the grid or empty
    pub fn extract_word(&self, grid: &Grid, positions: &[Position]) -> Option<String> {
        positions
            .iter()
            .map(|pos| {
                if grid.in_bounds(pos.x, pos.y) {
                    grid.get(pos.x, pos.y).map(|ch| ch.to_ascii_lowercase())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Whatever letters the path covers, for messages about rejected paths
    pub fn spell(&self, grid: &Grid, positions: &[Position]) -> String {
        positions
            .iter()
            .filter(|pos| grid.in_bounds(pos.x, pos.y))
            .filter_map(|pos| grid.get(pos.x, pos.y))
            .map(|ch| ch.to_ascii_lowercase())
            .collect()
    }
}

/// Check if two positions are adjacent (including diagonals)
pub fn are_adjacent(pos1: &Position, pos2: &Position) -> bool {
    let dx = pos1.x.abs_diff(pos2.x);
    let dy = pos1.y.abs_diff(pos2.y);

    dx <= 1 && dy <= 1 && (dx + dy > 0)
}

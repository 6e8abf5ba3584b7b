use crate::models::Position;

/// Settled letters on a fixed `rows x cols` board. Row 0 is the top.
///
/// Reads and writes are bounds-checked and panic on out-of-range coordinates:
/// the session checks occupancy and bounds before calling in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<char>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.cols,
            self.rows
        );
        y * self.cols + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        self.cells[self.index(x, y)]
    }

    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_none()
    }

    /// Write a letter into an empty cell
    pub fn place(&mut self, x: usize, y: usize, letter: char) {
        let idx = self.index(x, y);
        assert!(
            self.cells[idx].is_none(),
            "cell ({}, {}) already holds {:?}",
            x,
            y,
            self.cells[idx]
        );
        self.cells[idx] = Some(letter);
    }

    /// Erase every listed cell, then let each column fall.
    ///
    /// Gravity runs once over the post-removal board, so the order of
    /// `coords` never matters.
    pub fn remove_set(&mut self, coords: &[Position]) {
        for pos in coords {
            let idx = self.index(pos.x, pos.y);
            self.cells[idx] = None;
        }
        self.apply_gravity();
    }

    /// Compact every column downward, keeping the top-to-bottom order of the
    /// remaining letters and leaving the vacated cells at the top.
    fn apply_gravity(&mut self) {
        for x in 0..self.cols {
            let letters: Vec<char> = (0..self.rows)
                .filter_map(|y| self.cells[y * self.cols + x])
                .collect();
            let gap = self.rows - letters.len();

            for y in 0..self.rows {
                self.cells[y * self.cols + x] = if y < gap {
                    None
                } else {
                    Some(letters[y - gap])
                };
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    #[cfg(test)]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Letters of one column from top to bottom, skipping empty cells
    #[cfg(test)]
    pub fn column(&self, x: usize) -> Vec<char> {
        (0..self.rows).filter_map(|y| self.get(x, y)).collect()
    }

    /// Row-major copy for rendering
    pub fn to_rows(&self) -> Vec<Vec<Option<char>>> {
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }

    /// Build a grid from text rows, `.` marking an empty cell
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let cols = rows[0].chars().count();
        let mut grid = Grid::new(rows.len(), cols);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.chars().count(), cols, "ragged test grid");
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    grid.place(x, y, ch);
                }
            }
        }
        grid
    }
}

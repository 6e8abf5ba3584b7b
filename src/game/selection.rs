use crate::{
    game::{validator::are_adjacent, Grid},
    models::Position,
};

/// What a single cell activation did to the path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Empty path, so this cell began a new one
    Started,
    /// Appended an adjacent cell
    Extended,
    /// Cut the path back to an earlier cell
    Backtracked { len: usize },
    /// Dropped the old path and began again at this cell
    Restarted,
    /// The last cell was activated again. Carries the path that was
    /// submitted; the builder is left empty.
    Submit(Vec<Position>),
    /// Nothing changed
    Ignored,
}

/// Adjacency-chained selection built from discrete "cell activated" events.
///
/// Clicks, taps, and drag samples all feed the same `activate` call, so the
/// builder never needs to know which device produced an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPath {
    cells: Vec<Position>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Apply one activation. Rules, first match wins:
    /// 1. empty path and the cell holds a letter: start
    /// 2. cell is the last one: submit
    /// 3. cell appears earlier: truncate back to it
    /// 4. cell is adjacent to the last and holds a letter: append
    /// 5. cell holds a letter: restart from it
    /// 6. otherwise ignore
    pub fn activate(&mut self, pos: Position, grid: &Grid) -> Activation {
        let has_letter = !grid.is_empty(pos.x, pos.y);

        let Some(last) = self.cells.last().copied() else {
            if has_letter {
                self.cells.push(pos);
                return Activation::Started;
            }
            return Activation::Ignored;
        };

        if pos == last {
            return Activation::Submit(std::mem::take(&mut self.cells));
        }

        if let Some(idx) = self.cells.iter().position(|cell| *cell == pos) {
            self.cells.truncate(idx + 1);
            return Activation::Backtracked { len: idx + 1 };
        }

        if !has_letter {
            return Activation::Ignored;
        }

        if are_adjacent(&last, &pos) {
            self.cells.push(pos);
            Activation::Extended
        } else {
            self.cells.clear();
            self.cells.push(pos);
            Activation::Restarted
        }
    }
}

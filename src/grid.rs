// The boolean step matrix. Mutations are bounds-checked and silently
// ignore out-of-range coordinates; callers never see an error from here.

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<bool>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![false; cols]; rows],
            rows,
            cols,
        }
    }

    // Build a grid of the given dimensions from existing rows; cells
    // outside the source fill with false, cells outside the target drop.
    pub fn from_rows(source: &[Vec<bool>], rows: usize, cols: usize) -> Self {
        let mut grid = Grid::new(rows, cols);
        for (r, row) in source.iter().take(rows).enumerate() {
            for (c, &value) in row.iter().take(cols).enumerate() {
                grid.cells[r][c] = value;
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[Vec<bool>] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        if let Some(r) = self.cells.get_mut(row) {
            if let Some(cell) = r.get_mut(col) {
                *cell = value;
            }
        }
    }

    // Flip a cell and return its new value. Out of bounds is a no-op.
    pub fn toggle(&mut self, row: usize, col: usize) -> bool {
        let value = !self.get(row, col);
        self.set(row, col, value);
        self.get(row, col)
    }

    // Column count follows the viewport; rows never change. Overlapping
    // cells keep their values, new columns start empty.
    pub fn resize(&mut self, new_cols: usize) {
        if new_cols == self.cols {
            return;
        }
        let mut next = vec![vec![false; new_cols]; self.rows];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &value) in row.iter().take(new_cols).enumerate() {
                next[r][c] = value;
            }
        }
        self.cells = next;
        self.cols = new_cols;
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                *cell = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        let mut grid = Grid::new(13, 8);
        for (row, col) in [(0, 0), (5, 3), (12, 7)] {
            let before = grid.get(row, col);
            grid.toggle(row, col);
            grid.toggle(row, col);
            assert_eq!(grid.get(row, col), before);
        }
    }

    #[test]
    fn toggle_returns_new_value() {
        let mut grid = Grid::new(13, 8);
        assert!(grid.toggle(2, 2));
        assert!(!grid.toggle(2, 2));
    }

    #[test]
    fn out_of_bounds_is_silent() {
        let mut grid = Grid::new(13, 8);
        grid.set(13, 0, true);
        grid.set(0, 8, true);
        assert!(!grid.toggle(100, 100));
        assert_eq!(grid, Grid::new(13, 8));
        assert!(!grid.get(13, 0));
    }

    #[test]
    fn resize_preserves_overlap_and_zeroes_the_rest() {
        let mut grid = Grid::new(13, 16);
        grid.set(3, 2, true);
        grid.set(3, 12, true);

        grid.resize(8);
        assert_eq!(grid.cols(), 8);
        assert!(grid.get(3, 2));
        assert!(!grid.get(3, 12));

        grid.resize(16);
        assert_eq!(grid.cols(), 16);
        assert!(grid.get(3, 2));
        assert!(!grid.get(3, 12));
    }

    #[test]
    fn resize_to_same_width_is_idempotent() {
        let mut grid = Grid::new(13, 10);
        grid.set(1, 9, true);
        let snapshot = grid.clone();
        grid.resize(10);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn clear_empties_everything() {
        let mut grid = Grid::new(13, 8);
        grid.set(0, 0, true);
        grid.set(12, 7, true);
        grid.clear();
        assert_eq!(grid, Grid::new(13, 8));
    }

    #[test]
    fn from_rows_pads_and_truncates() {
        let source = vec![vec![true, false, true], vec![false, true, false]];
        let grid = Grid::from_rows(&source, 3, 2);
        assert!(grid.get(0, 0));
        assert!(!grid.get(0, 1));
        assert!(grid.get(1, 1));
        assert!(!grid.get(2, 0));
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 2);
    }
}

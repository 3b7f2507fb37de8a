use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Add,
    Remove,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    mode: Mode,
    last: (usize, usize),
}

// One continuous press-drag-release interaction. The state of the first
// cell touched decides whether the whole stroke paints or erases, so a
// drag sweeps one consistent operation across the grid instead of
// toggling every cell it crosses.
#[derive(Clone, Debug, Default)]
pub struct Paint {
    gesture: Option<Gesture>,
}

impl Paint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.gesture.map(|g| g.mode)
    }

    // Returns true when the press placed a note, which is the cue for
    // audible feedback. Erasing stays silent.
    pub fn press(&mut self, grid: &mut Grid, row: usize, col: usize) -> bool {
        if row >= grid.rows() || col >= grid.cols() {
            return false;
        }
        let was_set = grid.get(row, col);
        let mode = if was_set { Mode::Remove } else { Mode::Add };
        grid.set(row, col, !was_set);
        self.gesture = Some(Gesture {
            mode,
            last: (row, col),
        });
        mode == Mode::Add
    }

    // Returns true when the drag placed a note on a newly entered cell.
    // Lingering on the same cell does nothing; straying out of bounds
    // keeps the gesture alive for when the pointer comes back.
    pub fn drag(&mut self, grid: &mut Grid, row: usize, col: usize) -> bool {
        let Some(gesture) = &mut self.gesture else {
            return false;
        };
        if gesture.last == (row, col) || row >= grid.rows() || col >= grid.cols() {
            return false;
        }
        gesture.last = (row, col);
        grid.set(row, col, gesture.mode == Mode::Add);
        gesture.mode == Mode::Add
    }

    // Release never mutates the grid, even when it lands outside it.
    pub fn release(&mut self) {
        self.gesture = None;
    }
}

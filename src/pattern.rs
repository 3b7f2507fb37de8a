use rand::Rng;

use crate::grid::Grid;

// Random patterns favor the middle of the scale so they come out gentle;
// the extremes of the range stay sparse.
const MID_BAND: std::ops::Range<usize> = 4..10;
const MID_BIAS: f64 = 0.7;

// Replace the whole grid with a fresh random pattern: one to three notes
// per column, each row drawn from the middle band with probability 0.7
// and from the full range otherwise. Duplicate picks within a column
// collapse, so the per-column count is a soft upper bound.
pub fn generate(rows: usize, cols: usize, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::new(rows, cols);
    for col in 0..cols {
        let notes = rng.gen_range(1..=3);
        for _ in 0..notes {
            let row = if rows > MID_BAND.end && rng.gen_bool(MID_BIAS) {
                rng.gen_range(MID_BAND)
            } else {
                rng.gen_range(0..rows)
            };
            grid.set(row, col, true);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn column_count(grid: &Grid, col: usize) -> usize {
        (0..grid.rows()).filter(|&row| grid.get(row, col)).count()
    }

    #[test]
    fn every_column_gets_one_to_three_notes() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate(13, 16, &mut rng);
            for col in 0..grid.cols() {
                let count = column_count(&grid, col);
                assert!(
                    (1..=3).contains(&count),
                    "column {col} has {count} notes (seed {seed})"
                );
            }
        }
    }

    #[test]
    fn works_for_a_single_column() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate(13, 1, &mut rng);
        assert!((1..=3).contains(&column_count(&grid, 0)));
    }

    #[test]
    fn middle_band_receives_most_notes() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut mid = 0usize;
        let mut total = 0usize;
        for _ in 0..200 {
            let grid = generate(13, 16, &mut rng);
            for col in 0..grid.cols() {
                for row in 0..grid.rows() {
                    if grid.get(row, col) {
                        total += 1;
                        if MID_BAND.contains(&row) {
                            mid += 1;
                        }
                    }
                }
            }
        }
        let fraction = mid as f64 / total as f64;
        // 70% of picks target the band directly and the full-range picks
        // land in it roughly half the time on a 13-row grid.
        assert!(
            (0.70..0.95).contains(&fraction),
            "middle band fraction was {fraction}"
        );
    }

    #[test]
    fn short_grids_fall_back_to_the_full_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = generate(5, 8, &mut rng);
        for col in 0..grid.cols() {
            assert!((1..=3).contains(&column_count(&grid, col)));
        }
    }

    #[test]
    fn replaces_rather_than_accumulates() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = generate(13, 8, &mut rng);
        let active: usize = (0..8).map(|col| column_count(&grid, col)).sum();
        assert!(active <= 3 * 8);
    }
}

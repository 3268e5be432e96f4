use std::cell::OnceCell;

use autotris_engine::Board;

/// Lazily computed surface metrics of a board.
///
/// Borrows the board and computes each metric on first use. A column's
/// height is measured from the floor to its topmost occupied cell; a hole is
/// a blank cell with at least one occupied cell above it in the same column.
#[derive(Debug)]
pub struct SurfaceMetrics<'a> {
    board: &'a Board,
    column_heights: OnceCell<[u8; Board::PLAYABLE_WIDTH]>,
    hole_count: OnceCell<u32>,
}

impl<'a> SurfaceMetrics<'a> {
    #[must_use]
    pub fn from_board(board: &'a Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            hole_count: OnceCell::new(),
        }
    }

    /// Height of each playable column; an entirely blank column is 0.
    #[must_use]
    pub fn column_heights(&self) -> &[u8; Board::PLAYABLE_WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut heights = [0; Board::PLAYABLE_WIDTH];
            for (x, height) in Board::PLAYABLE_X_RANGE.zip(&mut heights) {
                let top = self
                    .board
                    .playable_rows()
                    .position(|row| row.is_cell_occupied(x));
                if let Some(top) = top {
                    *height = u8::try_from(Board::PLAYABLE_HEIGHT - top).unwrap();
                }
            }
            heights
        })
    }

    /// Total number of holes.
    ///
    /// Counted in one top-to-bottom pass per column: once an occupied cell
    /// has been seen, every blank cell below it in that column is a hole.
    #[must_use]
    pub fn hole_count(&self) -> u32 {
        *self.hole_count.get_or_init(|| {
            let mut holes = 0;
            for x in Board::PLAYABLE_X_RANGE {
                let mut covered = false;
                for row in self.board.playable_rows() {
                    if row.is_cell_occupied(x) {
                        covered = true;
                    } else if covered {
                        holes += 1;
                    }
                }
            }
            holes
        })
    }

    #[must_use]
    pub fn min_height(&self) -> u8 {
        *self.column_heights().iter().min().unwrap()
    }

    #[must_use]
    pub fn max_height(&self) -> u8 {
        *self.column_heights().iter().max().unwrap()
    }

    /// Arithmetic mean of the column heights.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn mean_height(&self) -> f64 {
        let total: u32 = self.column_heights().iter().map(|&h| u32::from(h)).sum();
        f64::from(total) / Board::PLAYABLE_WIDTH as f64
    }

    /// Population RMS deviation of the column heights from their mean.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn height_deviation(&self) -> f64 {
        let mean = self.mean_height();
        let sum_sq: f64 = self
            .column_heights()
            .iter()
            .map(|&h| {
                let d = mean - f64::from(h);
                d * d
            })
            .sum();
        (sum_sq / Board::PLAYABLE_WIDTH as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}",
        );
    }

    #[test]
    fn empty_board_is_all_zeros() {
        let board = Board::EMPTY;
        let metrics = SurfaceMetrics::from_board(&board);
        assert_eq!(metrics.column_heights(), &[0; Board::PLAYABLE_WIDTH]);
        assert_eq!(metrics.hole_count(), 0);
        assert_eq!(metrics.min_height(), 0);
        assert_eq!(metrics.max_height(), 0);
        assert_close(metrics.mean_height(), 0.0);
        assert_close(metrics.height_deviation(), 0.0);
    }

    #[test]
    fn column_height_is_measured_from_topmost_cell() {
        // Topmost occupied cell of column 0 at row 15 of 20: height 5, and
        // the blanks underneath it do not change that.
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #.........
            ..........
            ..........
            ..........
            #.........
            ",
        );
        let metrics = SurfaceMetrics::from_board(&board);
        assert_eq!(metrics.column_heights()[0], 5);
        assert_eq!(metrics.column_heights()[1], 0);
    }

    #[test]
    fn staircase_heights() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #.........
            ##........
            ###.......
            ####......
            #####.....
            ",
        );
        let metrics = SurfaceMetrics::from_board(&board);
        assert_eq!(
            metrics.column_heights(),
            &[5, 4, 3, 2, 1, 0, 0, 0, 0, 0],
        );
        assert_eq!(metrics.hole_count(), 0);
        assert_eq!(metrics.max_height(), 5);
        assert_eq!(metrics.min_height(), 0);
        assert_close(metrics.mean_height(), 1.5);
    }

    #[test]
    fn alternating_column_counts_two_holes() {
        // Occupied-blank-occupied-blank, top to bottom.
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #.........
            ..........
            #.........
            ..........
            ",
        );
        let metrics = SurfaceMetrics::from_board(&board);
        assert_eq!(metrics.hole_count(), 2);
        assert_eq!(metrics.column_heights()[0], 4);
    }

    #[test]
    fn holes_are_counted_per_column() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            #..#......
            ...#......
            #.........
            ",
        );
        // Column 0: one hole under the cell at row 17. Column 3: none.
        let metrics = SurfaceMetrics::from_board(&board);
        assert_eq!(metrics.hole_count(), 1);
    }

    #[test]
    fn flat_row_has_no_deviation() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ##########
            ##########
            ",
        );
        let metrics = SurfaceMetrics::from_board(&board);
        assert_close(metrics.mean_height(), 2.0);
        assert_close(metrics.height_deviation(), 0.0);
        assert_eq!(metrics.max_height() - metrics.min_height(), 0);
    }

    #[test]
    fn deviation_matches_population_formula() {
        // Heights 2,2,0,...,0: mean 0.4,
        // rms = sqrt((2 * 1.6^2 + 8 * 0.4^2) / 10) = sqrt(0.64).
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ##........
            ##........
            ",
        );
        let metrics = SurfaceMetrics::from_board(&board);
        assert_close(metrics.mean_height(), 0.4);
        assert_close(metrics.height_deviation(), 0.64_f64.sqrt());
    }

    #[test]
    fn metrics_work_on_a_scratch_clone() {
        let board = Board::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ####......
            ",
        );
        let scratch = board.clone();
        let live = SurfaceMetrics::from_board(&board);
        let copy = SurfaceMetrics::from_board(&scratch);
        assert_eq!(live.column_heights(), copy.column_heights());
        assert_eq!(live.hole_count(), copy.hole_count());
    }
}

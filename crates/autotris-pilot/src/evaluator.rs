use autotris_engine::Board;

use crate::metrics::SurfaceMetrics;

/// Weights of the board score's five terms.
///
/// [`EvalWeights::DEFAULT`] carries the tuned constants; they are empirically
/// chosen, so they live in a value type rather than being baked into the
/// formula, but changing them changes which placements the pilot picks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    /// Per hole (blank cell with an occupied cell above it).
    pub holes: f64,
    /// Per unit of mean column height.
    pub mean_height: f64,
    /// Per unit of tallest column height.
    pub max_height: f64,
    /// Per unit of tallest-minus-shortest column spread.
    pub height_range: f64,
    /// Per unit of RMS deviation of heights from their mean.
    pub height_deviation: f64,
}

impl EvalWeights {
    pub const DEFAULT: Self = Self {
        holes: 8.0,
        mean_height: 4.0,
        max_height: 3.0,
        height_range: 3.0,
        height_deviation: 2.0,
    };
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scores a board configuration; lower is better.
///
/// The score is a weighted sum over the surface metrics. It is a total,
/// deterministic function of the board: any board (empty, full, mid-game)
/// evaluates without error, and an empty board scores exactly 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardEvaluator {
    weights: EvalWeights,
}

impl BoardEvaluator {
    #[must_use]
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    #[must_use]
    pub fn evaluate(&self, board: &Board) -> f64 {
        let metrics = SurfaceMetrics::from_board(board);
        let w = &self.weights;
        let max_height = f64::from(metrics.max_height());
        let height_range = f64::from(metrics.max_height() - metrics.min_height());

        w.holes * f64::from(metrics.hole_count())
            + w.mean_height * metrics.mean_height()
            + w.max_height * max_height
            + w.height_range * height_range
            + w.height_deviation * metrics.height_deviation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> BoardEvaluator {
        BoardEvaluator::default()
    }

    #[test]
    fn empty_board_scores_zero() {
        assert_eq!(evaluator().evaluate(&Board::EMPTY), 0.0);
    }

    #[test]
    fn evaluation_is_deterministic() {
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
            ..#.......
            .###...#..
            ####...##.
            ####.#####
            ####.#####
            ",
        );
        let first = evaluator().evaluate(&board);
        for _ in 0..5 {
            assert_eq!(evaluator().evaluate(&board), first);
        }
    }

    #[test]
    fn flat_full_row_scores_from_heights_only() {
        // Heights all 1: holes 0, mean 1, max 1, range 0, deviation 0,
        // so score = 4.0 + 3.0 = 7.0.
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
            ##########
            ",
        );
        assert_eq!(evaluator().evaluate(&board), 7.0);
    }

    #[test]
    fn each_hole_costs_its_weight() {
        let covered = Board::from_ascii(
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
            #.........
            #.........
            ",
        );
        let with_hole = Board::from_ascii(
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
            #.........
            ..........
            ",
        );
        // Same height profile (column 0 height 2), one hole apart.
        let difference = evaluator().evaluate(&with_hole) - evaluator().evaluate(&covered);
        assert!((difference - EvalWeights::DEFAULT.holes).abs() < 1e-9);
    }

    #[test]
    fn taller_boards_score_worse() {
        let low = Board::from_ascii(
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
        let high = Board::from_ascii(
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
            #.........
            #.........
            #.........
            ",
        );
        assert!(evaluator().evaluate(&low) < evaluator().evaluate(&high));
    }
}

use autotris_engine::{Board, Piece, PieceKind, PieceRotation};

use crate::evaluator::BoardEvaluator;

/// The placement chosen for the current piece: where to put it and what the
/// board would score once it settles there.
///
/// A target lives from the first pilot tick of a piece until that piece is
/// dropped or replaced; it is never carried across piece boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    placement: Piece,
    score: f64,
}

impl Target {
    /// The settled piece: its rotation and column are what the actuator
    /// steers toward.
    #[must_use]
    pub fn placement(&self) -> Piece {
        self.placement
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Finds the best placement for a piece of the given kind on this board.
///
/// Tries every distinct rotation against every bounding-box anchor column of
/// the board (the sentinel-padded range, so shapes may overhang the border
/// columns of their box while their cells stay inside the grid). Candidates
/// that collide at the spawn row are unreachable and skipped. Each remaining
/// candidate is dropped straight down on a scratch copy of the board, locked,
/// and settled (completed rows clear, as they would in the live game), then
/// the settled board is scored; the minimum score wins, and an exact tie goes
/// to the column nearer the board's horizontal center.
///
/// Returns `None` when every candidate collides at spawn — there is no legal
/// placement and the game is about to end. The result is a pure function of
/// `(board, kind)`, and `board` is left untouched.
#[must_use]
pub fn compute_target(
    evaluator: &BoardEvaluator,
    board: &Board,
    kind: PieceKind,
) -> Option<Target> {
    let mut best: Option<Target> = None;

    for r in 0..kind.distinct_rotation_count() {
        let rotation = PieceRotation::from_index(r);
        for x in 0..Board::TOTAL_WIDTH {
            let candidate = Piece::candidate(kind, rotation, u8::try_from(x).unwrap());
            if board.is_colliding(candidate) {
                continue;
            }

            let mut scratch = board.clone();
            let placement = candidate.rest_position(&scratch);
            scratch.fill_piece(placement);
            scratch.clear_lines();
            let score = evaluator.evaluate(&scratch);

            if is_better(score, placement, best.as_ref()) {
                best = Some(Target { placement, score });
            }
        }
    }
    best
}

/// Comparator for the running best: lower score wins, ties go to the more
/// central column, and the first candidate seeds the best.
#[expect(clippy::float_cmp)]
fn is_better(score: f64, placement: Piece, best: Option<&Target>) -> bool {
    let Some(best) = best else {
        return true;
    };
    if score < best.score {
        return true;
    }
    score == best.score
        && center_distance(placement.position().x()) < center_distance(best.placement.position().x())
}

fn center_distance(x: usize) -> usize {
    x.abs_diff(Board::CENTER_COLUMN)
}

#[cfg(test)]
mod tests {
    use autotris_engine::Playfield;

    use super::*;

    fn evaluator() -> BoardEvaluator {
        BoardEvaluator::default()
    }

    #[test]
    fn search_leaves_the_live_board_untouched() {
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
            ..#.......
            .###....#.
            ####..####
            ####.#####
            ",
        );
        let snapshot = board.clone();
        let _ = compute_target(&evaluator(), &board, PieceKind::T);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn search_is_deterministic() {
        let field = Playfield::with_seed("0123456789abcdeffedcba9876543210".parse().unwrap());
        let kind = field.falling_piece().kind();
        let first = compute_target(&evaluator(), field.board(), kind);
        let second = compute_target(&evaluator(), field.board(), kind);
        assert_eq!(first, second);
    }

    #[test]
    fn equal_scores_resolve_to_the_central_column() {
        // On an empty board every O placement yields the same height
        // profile, so every candidate scores identically and only the
        // tie-break decides: the anchor ends up dead center.
        let target = compute_target(&evaluator(), &Board::EMPTY, PieceKind::O).unwrap();
        assert_eq!(target.placement().position().x(), Board::CENTER_COLUMN);
    }

    #[test]
    fn i_piece_fills_the_open_column() {
        // Four bottom rows full except playable column 5. Only the vertical
        // I dropped into that well settles to a clean board; any horizontal
        // placement leaves the deep well (and its range/deviation penalties)
        // behind, or buries it under holes.
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
            #####.####
            #####.####
            #####.####
            #####.####
            ",
        );
        let target = compute_target(&evaluator(), &board, PieceKind::I).unwrap();
        let placement = target.placement();

        assert_eq!(placement.rotation(), PieceRotation::from_index(1));
        let cells: Vec<(usize, usize)> = placement.occupied_positions().collect();
        // All four cells in the open column (playable column 5 = absolute 7).
        assert!(cells.iter().all(|&(x, _)| x == 7), "cells: {cells:?}");
        // Filling the well settles to an empty board.
        assert_eq!(target.score(), 0.0);
    }

    #[test]
    fn search_reaches_the_edge_columns() {
        // A lone deep well at the left edge: the vertical I must be able to
        // reach playable column 0 even though its bounding box then overlaps
        // the wall columns.
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
            .#########
            .#########
            .#########
            .#########
            ",
        );
        let target = compute_target(&evaluator(), &board, PieceKind::I).unwrap();
        let cells: Vec<(usize, usize)> = target.placement().occupied_positions().collect();
        // Absolute column 2 is playable column 0.
        assert!(cells.iter().all(|&(x, _)| x == 2), "cells: {cells:?}");
    }

    #[test]
    fn no_placement_when_spawn_is_walled_off() {
        // Occupy the spawn margin rows across the whole width, plus the top
        // playable rows, so every candidate collides immediately.
        let mut board = Board::from_ascii(
            "
            ##########
            ##########
            ##########
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
            ",
        );
        for x in (2..=10).step_by(2) {
            board.fill_piece(Piece::candidate(
                PieceKind::O,
                PieceRotation::default(),
                u8::try_from(x).unwrap(),
            ));
        }
        assert_eq!(compute_target(&evaluator(), &board, PieceKind::T), None);
        assert_eq!(compute_target(&evaluator(), &board, PieceKind::I), None);
    }
}

use crate::{
    PieceCollisionError, TopOutError,
    core::{board::Board, piece::Piece},
};

use super::queue::{PieceQueue, PieceSeed};

/// Single-turn game state: the board, the falling piece, and the queue.
#[derive(Debug, Clone)]
pub struct Playfield {
    board: Board,
    falling_piece: Piece,
    queue: PieceQueue,
}

impl Playfield {
    #[must_use]
    pub fn new() -> Self {
        Self::from_queue(PieceQueue::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_queue(PieceQueue::with_seed(seed))
    }

    fn from_queue(mut queue: PieceQueue) -> Self {
        let falling_piece = Piece::new(queue.pop_next());
        Self {
            board: Board::EMPTY,
            falling_piece,
            queue,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    /// Replaces the falling piece, rejecting positions that collide.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    /// Replaces the falling piece without a collision check.
    ///
    /// For placements already validated by the caller.
    pub fn set_falling_piece_unchecked(&mut self, piece: Piece) {
        self.falling_piece = piece;
    }

    /// Where the falling piece would come to rest if dropped now.
    #[must_use]
    pub fn rest_position(&self) -> Piece {
        self.falling_piece.rest_position(&self.board)
    }

    pub fn upcoming_pieces(&self) -> impl Iterator<Item = crate::PieceKind> + '_ {
        self.queue.upcoming()
    }

    /// Locks the falling piece, clears lines, and spawns the next piece.
    ///
    /// Returns the number of cleared lines, plus [`TopOutError`] when the
    /// newly spawned piece collides (the game is over).
    pub fn complete_drop(&mut self) -> (usize, Result<(), TopOutError>) {
        self.board.fill_piece(self.falling_piece);
        let cleared_lines = self.board.clear_lines();

        self.falling_piece = Piece::new(self.queue.pop_next());
        if self.board.is_colliding(self.falling_piece) {
            return (cleared_lines, Err(TopOutError));
        }
        (cleared_lines, Ok(()))
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Playfield {
        Playfield::with_seed("0123456789abcdeffedcba9876543210".parse().unwrap())
    }

    #[test]
    fn set_falling_piece_rejects_collisions() {
        let mut field = seeded();
        let piece = field.falling_piece();
        let settled = piece.rest_position(field.board());
        field.board.fill_piece(settled);

        assert!(field.set_falling_piece(settled).is_err());
        assert!(field.set_falling_piece(piece).is_ok());
    }

    #[test]
    fn complete_drop_locks_and_spawns() {
        let mut field = seeded();
        let dropped = field.rest_position();
        field.set_falling_piece_unchecked(dropped);

        let (cleared, result) = field.complete_drop();
        assert_eq!(cleared, 0);
        assert!(result.is_ok());
        // The locked cells are now part of the board.
        for (x, y) in dropped.occupied_positions() {
            assert!(field.board().playable_row(y - 2).is_cell_occupied(x));
        }
        // A fresh piece spawned at the top.
        assert_eq!(field.falling_piece().position(), Piece::new(field.falling_piece().kind()).position());
    }

    #[test]
    fn complete_drop_clears_full_lines() {
        let mut field = seeded();
        field.board = Board::from_ascii(
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
            ####.#####
            ",
        );
        // Drop a vertical I into the gap at playable column 4.
        let piece = Piece::candidate(
            crate::PieceKind::I,
            crate::PieceRotation::from_index(1),
            4,
        );
        field.set_falling_piece(piece).unwrap();
        field.set_falling_piece_unchecked(field.rest_position());

        let (cleared, result) = field.complete_drop();
        assert_eq!(cleared, 1);
        assert!(result.is_ok());
        // Three cells of the I remain above the cleared row.
        assert!(field.board().is_occupied(4, 19));
        assert!(field.board().is_occupied(4, 18));
        assert!(field.board().is_occupied(4, 17));
        assert!(!field.board().is_occupied(0, 19));
    }

    #[test]
    fn top_out_when_spawn_is_blocked() {
        let mut field = seeded();
        // Locking the falling piece while it still sits at the spawn position
        // leaves the spawn cells occupied, so the next piece must collide.
        let (_, result) = field.complete_drop();
        assert!(result.is_err());
    }
}

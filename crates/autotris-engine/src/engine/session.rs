use std::time::Duration;

use crate::{
    PieceCollisionError,
    core::{board::Board, piece::Piece},
};

use super::{
    field::Playfield,
    hooks::{LifecycleEvent, LifecycleHooks, ObserverId},
    queue::PieceSeed,
    stats::GameStats,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A running game: playfield, statistics, gravity, and lifecycle events.
///
/// The session is driven by [`Self::increment_frame`] at a fixed frame rate;
/// gravity is a frame countdown whose interval shrinks with the level. All
/// movement commands are collision-checked and report failure as
/// [`PieceCollisionError`] rather than mutating anything.
#[derive(Debug)]
pub struct GameSession {
    field: Playfield,
    stats: GameStats,
    state: SessionState,
    fps: u64,
    total_frames: u64,
    drop_frames: u64,
    hooks: LifecycleHooks,
}

/// Frames between gravity steps at the given level.
fn drop_interval_frames(level: u64, fps: u64) -> u64 {
    let millis = 100 + u64::saturating_sub(900, level * 100);
    millis * fps / 1000
}

impl GameSession {
    #[must_use]
    pub fn new(fps: u64) -> Self {
        Self::from_field(Playfield::new(), fps)
    }

    #[must_use]
    pub fn with_seed(fps: u64, seed: PieceSeed) -> Self {
        Self::from_field(Playfield::with_seed(seed), fps)
    }

    fn from_field(field: Playfield, fps: u64) -> Self {
        Self {
            field,
            stats: GameStats::new(),
            state: SessionState::Playing,
            fps,
            total_frames: 0,
            drop_frames: drop_interval_frames(0, fps),
            hooks: LifecycleHooks::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.field.falling_piece()
    }

    /// Where the falling piece would rest if hard-dropped now (ghost piece).
    #[must_use]
    pub fn rest_position(&self) -> Piece {
        self.field.rest_position()
    }

    pub fn upcoming_pieces(&self) -> impl Iterator<Item = crate::PieceKind> + '_ {
        self.field.upcoming_pieces()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Wall-clock play time derived from the frame counter.
    #[must_use]
    pub fn duration(&self) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let secs = self.total_frames / self.fps;
        let nanos = (self.total_frames % self.fps) * NANOS_PER_SEC / self.fps;
        Duration::new(secs, nanos.try_into().unwrap())
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Starts a fresh game on the same session, keeping registered observers.
    pub fn restart(&mut self) {
        self.field = Playfield::new();
        self.stats = GameStats::new();
        self.state = SessionState::Playing;
        self.total_frames = 0;
        self.drop_frames = drop_interval_frames(0, self.fps);
        self.hooks.notify(LifecycleEvent::GameStarted);
    }

    /// Advances the game by one frame; gravity no-ops unless playing.
    pub fn increment_frame(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.total_frames += 1;
        self.drop_frames = self.drop_frames.saturating_sub(1);
        if self.drop_frames == 0 {
            self.drop_frames = drop_interval_frames(self.stats.level() as u64, self.fps);
            self.gravity_step();
        }
    }

    /// One gravity step: soft-drop, or lock the piece once it cannot fall.
    fn gravity_step(&mut self) {
        if self.try_soft_drop().is_err() {
            self.complete_drop();
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.field.falling_piece().left().ok_or(PieceCollisionError)?;
        self.field.set_falling_piece(piece)
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self
            .field
            .falling_piece()
            .right()
            .ok_or(PieceCollisionError)?;
        self.field.set_falling_piece(piece)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.field.falling_piece().down().ok_or(PieceCollisionError)?;
        self.field.set_falling_piece(piece)
    }

    /// Rotates one step clockwise; a colliding rotation is rejected as-is
    /// (no wall kicks).
    pub fn try_rotate_right(&mut self) -> Result<(), PieceCollisionError> {
        self.field
            .set_falling_piece(self.field.falling_piece().rotated_right())
    }

    pub fn try_rotate_left(&mut self) -> Result<(), PieceCollisionError> {
        self.field
            .set_falling_piece(self.field.falling_piece().rotated_left())
    }

    /// Drops the falling piece to its resting position and locks it.
    pub fn hard_drop_and_complete(&mut self) {
        let rested = self.field.rest_position();
        self.field.set_falling_piece_unchecked(rested);
        self.complete_drop();
    }

    fn complete_drop(&mut self) {
        let (cleared_lines, result) = self.field.complete_drop();
        self.stats.complete_drop(cleared_lines);
        if result.is_err() {
            self.state = SessionState::GameOver;
        }
        // The next piece exists either way; observers holding plans for the
        // previous piece must drop them even when the spawn topped out.
        self.hooks.notify(LifecycleEvent::PieceSpawned);
    }

    /// Registers a lifecycle observer; see [`LifecycleEvent`].
    pub fn subscribe_lifecycle(
        &mut self,
        observer: Box<dyn FnMut(LifecycleEvent)>,
    ) -> ObserverId {
        self.hooks.subscribe(observer)
    }

    pub fn unsubscribe_lifecycle(&mut self, id: ObserverId) {
        self.hooks.unsubscribe(id);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::{PieceKind, PieceRotation};

    use super::*;

    const FPS: u64 = 60;

    fn seeded() -> GameSession {
        GameSession::with_seed(FPS, "0123456789abcdeffedcba9876543210".parse().unwrap())
    }

    #[test]
    fn gravity_moves_the_piece_after_the_drop_interval() {
        let mut session = seeded();
        let y0 = session.falling_piece().position().y();
        for _ in 0..drop_interval_frames(0, FPS) {
            session.increment_frame();
        }
        assert_eq!(session.falling_piece().position().y(), y0 + 1);
    }

    #[test]
    fn frames_are_ignored_while_paused() {
        let mut session = seeded();
        let y0 = session.falling_piece().position().y();
        session.toggle_pause();
        for _ in 0..drop_interval_frames(0, FPS) * 2 {
            session.increment_frame();
        }
        assert_eq!(session.falling_piece().position().y(), y0);
        assert_eq!(session.duration(), Duration::ZERO);
    }

    #[test]
    fn pause_cannot_resurrect_a_finished_game() {
        let mut session = seeded();
        session.complete_drop();
        assert!(session.state().is_game_over());
        session.toggle_pause();
        assert!(session.state().is_game_over());
    }

    #[test]
    fn hard_drop_locks_and_spawns() {
        let mut session = seeded();
        let rested = session.rest_position();
        session.hard_drop_and_complete();
        assert_eq!(session.stats().completed_pieces(), 1);
        for (x, y) in rested.occupied_positions() {
            assert!(session.board().playable_row(y - 2).is_cell_occupied(x));
        }
    }

    #[test]
    fn rotation_against_the_wall_is_rejected() {
        let mut session = seeded();
        // Vertical I hugging the left wall: the horizontal rotation would
        // need cells inside the wall, and without kicks it must fail.
        let piece = Piece::candidate(PieceKind::I, PieceRotation::from_index(1), 0);
        session.field.set_falling_piece(piece).unwrap();
        assert!(session.try_rotate_right().is_err());
        assert_eq!(session.falling_piece(), piece);
    }

    #[test]
    fn piece_spawned_fires_on_every_completed_drop() {
        let mut session = seeded();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe_lifecycle(Box::new(move |event| sink.borrow_mut().push(event)));

        session.hard_drop_and_complete();
        assert_eq!(*events.borrow(), vec![LifecycleEvent::PieceSpawned]);
    }

    #[test]
    fn game_started_fires_on_restart() {
        let mut session = seeded();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe_lifecycle(Box::new(move |event| sink.borrow_mut().push(event)));

        session.restart();
        assert_eq!(*events.borrow(), vec![LifecycleEvent::GameStarted]);
        assert!(session.state().is_playing());
        assert_eq!(session.stats().completed_pieces(), 0);
    }

    #[test]
    fn unsubscribed_observer_stops_receiving() {
        let mut session = seeded();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = session.subscribe_lifecycle(Box::new(move |event| sink.borrow_mut().push(event)));

        session.unsubscribe_lifecycle(id);
        session.hard_drop_and_complete();
        assert!(events.borrow().is_empty());
    }
}

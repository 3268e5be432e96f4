use std::{cell::Cell, rc::Rc, time::Duration};

use autotris_engine::{GameSession, LifecycleEvent, ObserverId, PieceCollisionError};

use crate::{
    evaluator::{BoardEvaluator, EvalWeights},
    search::{Target, compute_target},
};

/// Configuration handed to [`Pilot::engage`].
///
/// Explicit values, no ambient state: the tick interval tells the caller how
/// often to invoke [`Pilot::tick`], and the weights parameterize the board
/// evaluator for this pilot instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotConfig {
    /// How often the external timer should tick the pilot.
    pub tick_interval: Duration,
    pub weights: EvalWeights,
}

impl PilotConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            weights: EvalWeights::DEFAULT,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EngageError {
    /// The session is at game over; there is no piece to steer.
    #[display("autonomous control requires an active game")]
    NoActiveGame,
}

/// What a single pilot tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Preconditions not met (paused or game over); nothing happened.
    Idle,
    /// No legal placement exists for the current piece; top-out is imminent.
    NoPlacement,
    Rotated,
    ShiftedLeft,
    ShiftedRight,
    /// The piece reached its target and was hard-dropped; the target is gone.
    Dropped,
    /// An action failed against the current board; the target was discarded
    /// and the next tick will recompute.
    Blocked,
}

/// The autonomous controller: holds at most one placement target for the
/// current piece and advances toward it one action per tick.
///
/// Created by [`Self::engage`] when autonomous control is switched on and
/// dropped via [`Self::disengage`] when it is switched off; the pilot's
/// existence is the "enabled" flag. While engaged it subscribes to the
/// session's lifecycle events, so a restart or a newly spawned piece
/// invalidates the held target before the next tick acts on it.
#[derive(Debug)]
pub struct Pilot {
    config: PilotConfig,
    evaluator: BoardEvaluator,
    target: Option<Target>,
    stale: Rc<Cell<bool>>,
    observer: ObserverId,
}

impl Pilot {
    /// Switches autonomous control on for the given session.
    ///
    /// Fails when the session has no active game; the activation is rolled
    /// back (nothing is registered) and the error carries the user-facing
    /// message.
    pub fn engage(
        session: &mut GameSession,
        config: PilotConfig,
    ) -> Result<Self, EngageError> {
        if session.state().is_game_over() {
            return Err(EngageError::NoActiveGame);
        }
        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        let observer = session.subscribe_lifecycle(Box::new(move |event| match event {
            LifecycleEvent::GameStarted | LifecycleEvent::PieceSpawned => flag.set(true),
        }));
        Ok(Self {
            evaluator: BoardEvaluator::new(config.weights),
            config,
            target: None,
            stale,
            observer,
        })
    }

    /// Switches autonomous control off, unregistering the lifecycle observer.
    pub fn disengage(self, session: &mut GameSession) {
        session.unsubscribe_lifecycle(self.observer);
    }

    #[must_use]
    pub fn config(&self) -> &PilotConfig {
        &self.config
    }

    /// The target currently steered toward, if one is held.
    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Performs one pilot step: at most one discrete game action.
    ///
    /// Ticks while the session is paused or over are silent no-ops. When no
    /// valid target is held (first tick for a piece, or the lifecycle
    /// observer flagged the held one stale), the placement search runs first
    /// and the tick still performs its action, so a piece needing `k`
    /// rotations and `m` shifts is down `k + m + 1` ticks after it spawned.
    pub fn tick(&mut self, session: &mut GameSession) -> StepOutcome {
        if !session.state().is_playing() {
            return StepOutcome::Idle;
        }
        if self.stale.take() {
            self.target = None;
        }
        if self.target.is_none() {
            self.target =
                compute_target(&self.evaluator, session.board(), session.falling_piece().kind());
        }
        let Some(target) = self.target else {
            return StepOutcome::NoPlacement;
        };

        let placement = target.placement();
        let falling = session.falling_piece();
        if falling.rotation() != placement.rotation() {
            return self.checked(session.try_rotate_right(), StepOutcome::Rotated);
        }
        if falling.position().x() < placement.position().x() {
            return self.checked(session.try_move_right(), StepOutcome::ShiftedRight);
        }
        if falling.position().x() > placement.position().x() {
            return self.checked(session.try_move_left(), StepOutcome::ShiftedLeft);
        }
        session.hard_drop_and_complete();
        self.target = None;
        StepOutcome::Dropped
    }

    /// Maps an action result to its outcome, dropping the target on failure
    /// so the next tick replans from the live state.
    fn checked(
        &mut self,
        result: Result<(), PieceCollisionError>,
        outcome: StepOutcome,
    ) -> StepOutcome {
        match result {
            Ok(()) => outcome,
            Err(PieceCollisionError) => {
                self.target = None;
                StepOutcome::Blocked
            }
        }
    }
}

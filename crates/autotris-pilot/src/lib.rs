//! Autonomous player for the autotris engine.
//!
//! The pilot decides, tick by tick, how to steer the falling piece so that
//! the settled board stays as flat and hole-free as possible. It is built
//! from three layers:
//!
//! 1. **Surface metrics** ([`metrics`]) - per-column heights, hole count,
//!    and height statistics derived from a board.
//! 2. **Evaluation and search** ([`evaluator`], [`search`]) - a weighted
//!    score over the metrics (lower is better) and an exhaustive search over
//!    every (rotation, column) placement of the current piece, simulated on
//!    a scratch copy of the board.
//! 3. **Actuation** ([`actuator`]) - a small state machine that holds the
//!    chosen target and, on each timer tick, performs exactly one game
//!    action (rotate, shift, or hard-drop) toward it.
//!
//! The one-action-per-tick discipline is deliberate: the piece visibly walks
//! into place and a human can interrupt or step the pilot between ticks.
//! Searches run synchronously inside a tick against a disposable board
//! clone, so the live game state is never touched by simulation.

pub use self::{actuator::*, evaluator::*, metrics::*, search::*};

pub mod actuator;
pub mod evaluator;
pub mod metrics;
pub mod search;

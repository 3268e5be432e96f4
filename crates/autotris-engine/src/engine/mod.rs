//! Game engine: state management on top of the core data structures.
//!
//! - [`Playfield`] - board, falling piece, and piece queue for one game
//! - [`GameSession`] - running game with gravity, pause, stats, and events
//! - [`GameStats`] - score, level, and line-clear bookkeeping
//! - [`PieceQueue`] / [`PieceSeed`] - seeded 7-bag piece generation
//! - [`LifecycleEvent`] / [`ObserverId`] - subscription to "game started"
//!   and "piece spawned" notifications
//!
//! A game advances by calling [`GameSession::increment_frame`] at a fixed
//! rate; movement commands come from the player or from an autonomous
//! controller between frames. Autonomous controllers subscribe to lifecycle
//! events to learn when the piece they were steering is gone.

pub use self::{field::*, hooks::*, queue::*, session::*, stats::*};

mod field;
mod hooks;
mod queue;
mod session;
mod stats;

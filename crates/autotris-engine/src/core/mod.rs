pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

pub(crate) const PLAYABLE_WIDTH: usize = 10;
pub(crate) const PLAYABLE_HEIGHT: usize = 20;
pub(crate) const MARGIN_SIDE: usize = 2;
pub(crate) const MARGIN_TOP: usize = 2;
pub(crate) const MARGIN_BOTTOM: usize = 2;
pub(crate) const TOTAL_WIDTH: usize = MARGIN_SIDE + PLAYABLE_WIDTH + MARGIN_SIDE;
pub(crate) const TOTAL_HEIGHT: usize = MARGIN_TOP + PLAYABLE_HEIGHT + MARGIN_BOTTOM;

use autotris_engine::{Piece, PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, CellGlyph};

/// Renders the upcoming pieces, one spawn-orientation shape per slot.
#[derive(Debug)]
pub struct QueueDisplay<'a> {
    pieces: Vec<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

/// Rows reserved per previewed piece (all spawn shapes fit in 4x2 cells).
const SLOT_ROWS: u16 = 2;

impl<'a> QueueDisplay<'a> {
    pub fn new<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        Self {
            pieces: pieces.into_iter().collect(),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let slots = u16::try_from(self.pieces.len()).unwrap();
        slots * (SLOT_ROWS + 1) + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for QueueDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &QueueDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (slot, &kind) in self.pieces.iter().enumerate() {
            let top = area.y + slot as u16 * (SLOT_ROWS + 1);
            // The candidate anchored at column 0 makes the absolute cell
            // coordinates the in-box offsets.
            let shape = Piece::candidate(kind, PieceRotation::default(), 0);
            for (dx, dy) in shape.occupied_positions() {
                let cell = Rect {
                    x: area.x + dx as u16 * BlockDisplay::width(),
                    y: top + dy as u16 * BlockDisplay::height(),
                    width: BlockDisplay::width(),
                    height: BlockDisplay::height(),
                }
                .intersection(area);
                if !cell.is_empty() {
                    BlockDisplay::from_glyph(CellGlyph::Piece(kind), false).render(cell, buf);
                }
            }
        }
    }
}

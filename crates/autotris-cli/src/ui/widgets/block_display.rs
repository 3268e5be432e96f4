use autotris_engine::PieceKind;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// What a single board cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellGlyph {
    Empty,
    /// A settled cell of the stack.
    Stack,
    /// Outline of where the falling piece would land.
    Ghost,
    /// A cell of the falling piece, colored by kind.
    Piece(PieceKind),
}

/// Renders one cell as a two-column terminal block.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_glyph(glyph: CellGlyph, show_dots: bool) -> Self {
        match glyph {
            CellGlyph::Empty => {
                if show_dots {
                    Self::new(style::EMPTY_DOT, ".")
                } else {
                    Self::new(style::DEFAULT, "")
                }
            }
            CellGlyph::Stack => Self::new(style::STACK, ""),
            CellGlyph::Ghost => Self::new(style::GHOST, "[]"),
            CellGlyph::Piece(kind) => {
                let style = match kind {
                    PieceKind::I => style::I_BLOCK,
                    PieceKind::O => style::O_BLOCK,
                    PieceKind::S => style::S_BLOCK,
                    PieceKind::Z => style::Z_BLOCK,
                    PieceKind::J => style::J_BLOCK,
                    PieceKind::L => style::L_BLOCK,
                    PieceKind::T => style::T_BLOCK,
                };
                Self::new(style, "")
            }
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // A Paragraph fills the whole cell area, not just the symbol glyphs.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

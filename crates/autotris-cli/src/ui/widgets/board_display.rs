use autotris_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, CellGlyph};

/// Renders the playable grid: settled cells, the ghost outline, and the
/// falling piece on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<Piece>,
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            ghost: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        Board::PLAYABLE_WIDTH as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        Board::PLAYABLE_HEIGHT as u16 * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn glyph_grid(&self) -> [[CellGlyph; Board::PLAYABLE_WIDTH]; Board::PLAYABLE_HEIGHT] {
        let mut grid = [[CellGlyph::Empty; Board::PLAYABLE_WIDTH]; Board::PLAYABLE_HEIGHT];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, glyph) in row.iter_mut().enumerate() {
                if self.board.is_occupied(x, y) {
                    *glyph = CellGlyph::Stack;
                }
            }
        }
        let mut overlay = |piece: Piece, glyph: CellGlyph| {
            for (x, y) in piece.occupied_positions() {
                if Board::PLAYABLE_X_RANGE.contains(&x) && Board::PLAYABLE_Y_RANGE.contains(&y) {
                    grid[y - Board::PLAYABLE_Y_RANGE.start][x - Board::PLAYABLE_X_RANGE.start] =
                        glyph;
                }
            }
        };
        if let Some(ghost) = self.ghost {
            overlay(ghost, CellGlyph::Ghost);
        }
        if let Some(piece) = self.falling_piece {
            overlay(piece, CellGlyph::Piece(piece.kind()));
        }
        grid
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (y, row) in self.glyph_grid().into_iter().enumerate() {
            for (x, glyph) in row.into_iter().enumerate() {
                let cell = Rect {
                    x: area.x + x as u16 * BlockDisplay::width(),
                    y: area.y + y as u16 * BlockDisplay::height(),
                    width: BlockDisplay::width(),
                    height: BlockDisplay::height(),
                }
                .intersection(area);
                if !cell.is_empty() {
                    BlockDisplay::from_glyph(glyph, true).render(cell, buf);
                }
            }
        }
    }
}

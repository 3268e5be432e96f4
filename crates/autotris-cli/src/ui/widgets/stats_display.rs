use autotris_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget},
};

/// Renders the session statistics and whether the pilot is engaged.
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    pilot_engaged: bool,
    block: Option<BlockWidget<'a>>,
}

const WIDTH: u16 = 18;
const ROWS: u16 = 6;

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession, pilot_engaged: bool) -> Self {
        Self {
            session,
            pilot_engaged,
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
        WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROWS + super::block_vertical_margin(self.block.as_ref())
    }

    fn rows(&self) -> [(&'static str, String); ROWS as usize] {
        let stats = self.session.stats();
        let time = self.session.duration();
        [
            ("SCORE", stats.score().to_string()),
            ("LEVEL", stats.level().to_string()),
            ("LINES", stats.total_cleared_lines().to_string()),
            ("PIECES", stats.completed_pieces().to_string()),
            (
                "TIME",
                format!("{}:{:02}", time.as_secs() / 60, time.as_secs() % 60),
            ),
            ("PILOT", String::from(if self.pilot_engaged { "ON" } else { "OFF" })),
        ]
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let width = usize::from(WIDTH);
        let lines: Vec<Line> = self
            .rows()
            .into_iter()
            .map(|(label, value)| {
                let pad = width.saturating_sub(label.len() + value.len());
                Line::from(format!("{label}{}{value}", " ".repeat(pad)))
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}

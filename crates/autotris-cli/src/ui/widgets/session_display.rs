use autotris_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Widget},
};

use super::{BoardDisplay, QueueDisplay, StatsDisplay, color, style};

/// Composite view of one game session: stats, board, and piece queue, with
/// a state-dependent border and a PAUSED / GAME OVER overlay.
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    pilot_engaged: bool,
    next_pieces: usize,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, pilot_engaged: bool) -> Self {
        Self {
            session,
            pilot_engaged,
            next_pieces: 5,
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = match self.session.state() {
            SessionState::Playing if self.pilot_engaged => color::MAGENTA,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };
        let bordered = || {
            Block::bordered()
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let board = BoardDisplay::new(self.session.board())
            .falling_piece(self.session.falling_piece())
            .ghost(self.session.rest_position())
            .block(bordered());
        let queue = QueueDisplay::new(self.session.upcoming_pieces().take(self.next_pieces))
            .block(bordered().title(Line::from("NEXT").centered()));
        let stats = StatsDisplay::new(self.session, self.pilot_engaged)
            .block(bordered().title(Line::from("STATS").centered()));

        let [stats_column, board_column, queue_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(board.width()),
            Constraint::Length(queue.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [queue_area] =
            Layout::vertical([Constraint::Length(queue.height())]).areas(queue_column);

        stats.render(stats_area, buf);
        board.render(board_area, buf);
        queue.render(queue_area, buf);

        let popup = match self.session.state() {
            SessionState::Playing => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };
        if let Some((label, popup_style)) = popup {
            let popup_area = Rect {
                x: board_area.x,
                y: board_area.y + board_area.height.saturating_sub(3) / 2,
                width: board_area.width,
                height: 3,
            }
            .intersection(board_area);
            Clear.render(popup_area, buf);
            Block::new().style(popup_style).render(popup_area, buf);
            let text_area = Rect {
                y: popup_area.y + popup_area.height / 2,
                height: 1,
                ..popup_area
            };
            Text::styled(label, popup_style)
                .centered()
                .render(text_area, buf);
        }
    }
}

use std::time::Duration;

use autotris_engine::{GameSession, PieceSeed};
use autotris_pilot::{Pilot, PilotConfig, StepOutcome};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, Runtime},
    ui::widgets::SessionDisplay,
};

const FPS: u64 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Engage autonomous control from the start
    #[clap(long)]
    pilot: bool,
    /// Seconds between autonomous control actions
    #[clap(long, default_value_t = 0.2)]
    pilot_interval: f64,
    /// Piece generator seed (32 hex characters) for a reproducible game
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            pilot: false,
            pilot_interval: 0.2,
            seed: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut app = PlayApp::new(arg);
    Runtime::new().run(&mut app)?;
    Ok(())
}

#[derive(Debug)]
struct PlayApp {
    session: GameSession,
    pilot: Option<Pilot>,
    pilot_config: PilotConfig,
    frames_per_pilot_tick: u64,
    frames_until_pilot_tick: u64,
    status: Option<String>,
    is_exiting: bool,
}

/// The pilot interval expressed in whole frames, at least one.
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pilot_tick_frames(interval: Duration) -> u64 {
    ((interval.as_secs_f64() * FPS as f64).round() as u64).max(1)
}

impl PlayApp {
    fn new(arg: &PlayArg) -> Self {
        let session = match arg.seed {
            Some(seed) => GameSession::with_seed(FPS, seed),
            None => GameSession::new(FPS),
        };
        let pilot_config = PilotConfig {
            tick_interval: Duration::from_secs_f64(arg.pilot_interval),
            ..PilotConfig::default()
        };
        let frames_per_pilot_tick = pilot_tick_frames(pilot_config.tick_interval);
        let mut app = Self {
            session,
            pilot: None,
            pilot_config,
            frames_per_pilot_tick,
            frames_until_pilot_tick: frames_per_pilot_tick,
            status: None,
            is_exiting: false,
        };
        if arg.pilot {
            app.toggle_pilot();
        }
        app
    }

    /// Switches autonomous control on or off; a rejected activation leaves
    /// the mode off and shows the reason in the status line.
    fn toggle_pilot(&mut self) {
        match self.pilot.take() {
            Some(pilot) => {
                pilot.disengage(&mut self.session);
                self.status = Some("autopilot off".to_owned());
            }
            None => match Pilot::engage(&mut self.session, self.pilot_config) {
                Ok(pilot) => {
                    self.pilot = Some(pilot);
                    self.frames_until_pilot_tick = self.frames_per_pilot_tick;
                    self.status = Some("autopilot on".to_owned());
                }
                Err(err) => self.status = Some(err.to_string()),
            },
        }
    }

    /// One pilot tick, shared by the timer and the manual step key.
    fn pilot_step(&mut self) {
        let Some(pilot) = &mut self.pilot else {
            self.status = Some("autopilot is off".to_owned());
            return;
        };
        if pilot.tick(&mut self.session) == StepOutcome::NoPlacement {
            self.status = Some("no legal placement".to_owned());
        }
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(FPS as f64);
        runtime.set_render_rate(FPS as f64);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        let is_playing = self.session.state().is_playing();
        let is_paused = self.session.state().is_paused();
        let can_toggle_pause = is_playing || is_paused;

        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Left if is_playing => _ = self.session.try_move_left(),
                KeyCode::Right if is_playing => _ = self.session.try_move_right(),
                KeyCode::Down if is_playing => _ = self.session.try_soft_drop(),
                KeyCode::Up if is_playing => self.session.hard_drop_and_complete(),
                KeyCode::Char('z') if is_playing => _ = self.session.try_rotate_left(),
                KeyCode::Char('x') if is_playing => _ = self.session.try_rotate_right(),
                KeyCode::Char('p') if can_toggle_pause => self.session.toggle_pause(),
                KeyCode::Char('a') => self.toggle_pilot(),
                KeyCode::Char('s') => self.pilot_step(),
                KeyCode::Char('r') => {
                    self.session.restart();
                    self.status = None;
                }
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn update(&mut self) {
        self.session.increment_frame();
        if self.pilot.is_some() && self.session.state().is_playing() {
            self.frames_until_pilot_tick -= 1;
            if self.frames_until_pilot_tick == 0 {
                self.frames_until_pilot_tick = self.frames_per_pilot_tick;
                self.pilot_step();
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let help = match self.session.state() {
            s if s.is_playing() => {
                "← → (Move) | ↓ (Soft Drop) | ↑ (Hard Drop) | Z X (Rotate) | \
                 A (Autopilot) | S (Step) | P (Pause) | R (Restart) | Q (Quit)"
            }
            s if s.is_paused() => "P (Resume) | A (Autopilot) | S (Step) | Q (Quit)",
            _ => "R (Restart) | Q (Quit)",
        };
        let help = Text::from(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        let status = Text::from(self.status.as_deref().unwrap_or_default())
            .style(Style::default().fg(Color::Yellow))
            .centered();

        let [main_area, help_area, status_area] = Layout::vertical([
            Constraint::Min(22),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            SessionDisplay::new(&self.session, self.pilot.is_some()),
            main_area,
        );
        frame.render_widget(help, help_area);
        frame.render_widget(status, status_area);
    }
}

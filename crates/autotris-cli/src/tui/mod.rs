//! Minimal tick/render runtime for the ratatui front end.
//!
//! An external cooperative timer drives the game: `Tick` events advance game
//! logic (gravity and the pilot), `Render` events draw, and crossterm events
//! feed input handling. Nothing runs between events.

use std::{io, time::Duration};

use crossterm::event::Event as CrosstermEvent;
use ratatui::Frame;

use self::event_loop::{EventLoop, TuiEvent};

mod event_loop;

/// Trait for applications executed by [`Runtime::run`].
pub trait App {
    /// Called once before the loop starts; configure rates here.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize).
    fn handle_event(&mut self, event: CrosstermEvent);

    /// Draws the screen, called on each render event.
    fn draw(&self, frame: &mut Frame);

    /// Advances application logic, called on each tick event.
    fn update(&mut self);
}

/// TUI application runtime: owns the event loop and the terminal session.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in Hz.
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the maximum render rate in Hz.
    pub fn set_render_rate(&mut self, rate: f64) {
        self.events
            .set_render_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Runs the application until [`App::should_exit`] returns true.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(event),
                }
            }
            Ok(())
        })
    }
}

//! Terminal lifecycle and the interactive event loop.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tracing::{debug, info};

use crate::app::{App, Flow};
use crate::key::action_for;
use crate::present::{self, Layout};

/// Errors from running the interactive display.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Terminal setup or teardown failed.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),

    /// Reading input failed.
    #[error("event poll error: {0}")]
    EventPoll(#[source] io::Error),

    /// Writing a frame failed.
    #[error("render error: {0}")]
    Render(#[source] io::Error),
}

/// Result alias for [`Program`].
pub type Result<T> = std::result::Result<T, Error>;

/// Raw mode, alternate screen and a hidden cursor for as long as it lives.
struct TerminalGuard<W: Write> {
    writer: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(mut writer: W) -> Result<Self> {
        enable_raw_mode()?;
        let guard_result = execute!(writer, EnterAlternateScreen, Hide, Clear(ClearType::All));
        let guard = Self { writer };
        guard_result?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.writer, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Owns the app and drives it from terminal input and the frame clock.
pub struct Program {
    app: App,
    frame: Duration,
}

impl Program {
    /// Creates a program redrawing `fps` times per second.
    pub fn new(app: App, fps: u32) -> Self {
        Self {
            app,
            frame: Duration::from_secs(1) / fps.max(1),
        }
    }

    /// Runs until the user quits, restoring the terminal on every exit
    /// path.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up, read or written.
    pub fn run(self) -> Result<App> {
        self.run_with_writer(io::stdout())
    }

    /// Runs the program with a custom writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up, read or written.
    pub fn run_with_writer<W: Write>(mut self, writer: W) -> Result<App> {
        let mut guard = TerminalGuard::enter(writer)?;
        let (cols, rows) = terminal::size()?;
        let mut layout = Layout::new(cols, rows);
        info!(cols, rows, frame_ms = self.frame.as_millis() as u64, "interactive session started");

        let mut next_frame = Instant::now();
        loop {
            let now = Instant::now();
            let wait = next_wake(&self.app, now, next_frame).saturating_duration_since(now);
            if event::poll(wait).map_err(Error::EventPoll)? {
                match event::read().map_err(Error::EventPoll)? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = action_for(key.code, key.modifiers) {
                            debug!(?action, "key");
                            if self.app.apply(action) == Flow::Quit {
                                break;
                            }
                        }
                    }
                    Event::Resize(cols, rows) => {
                        debug!(cols, rows, "resize");
                        layout = Layout::new(cols, rows);
                        execute!(guard.writer, Clear(ClearType::All)).map_err(Error::Render)?;
                    }
                    _ => {}
                }
            }

            // Runners tick on their own cadence, frames only repaint.
            let now = Instant::now();
            self.app.poll(now);
            if now < next_frame {
                continue;
            }
            present::draw(&mut guard.writer, &mut self.app, layout).map_err(Error::Render)?;
            guard.writer.flush().map_err(Error::Render)?;
            next_frame = now + self.frame;
        }

        info!("interactive session ended");
        Ok(self.app)
    }
}

/// The next instant the loop must wake: the next frame, or sooner if a
/// running simulation falls due first.
fn next_wake(app: &App, now: Instant, next_frame: Instant) -> Instant {
    app.due_in(now)
        .map_or(next_frame, |due| next_frame.min(now + due))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use physlab::SimKind;

    #[test]
    fn frame_interval_from_fps() {
        let app = App::new(&Config::default()).unwrap();
        let program = Program::new(app, 30);
        assert_eq!(program.frame, Duration::from_secs(1) / 30);
    }

    #[test]
    fn zero_fps_does_not_divide_by_zero() {
        let app = App::new(&Config::default()).unwrap();
        let program = Program::new(app, 0);
        assert_eq!(program.frame, Duration::from_secs(1));
    }

    #[test]
    fn next_wake_is_next_frame_when_idle() {
        let app = App::new(&Config::default()).unwrap();
        let now = Instant::now();
        let frame = now + Duration::from_millis(33);
        assert_eq!(next_wake(&app, now, frame), frame);
    }

    #[test]
    fn fast_simulation_keeps_its_cadence_between_frames() {
        let config = Config {
            tab: SimKind::Pendulum,
            autostart: true,
            ..Config::default()
        };
        let mut app = App::new(&config).unwrap();
        let interval = app.runner().control().interval();
        assert_eq!(interval, Duration::from_millis(20));

        // Same wake-up schedule as the event loop, on a virtual clock with
        // no input arriving.
        let frame = Duration::from_secs(1) / 30;
        let t0 = Instant::now();
        let end = t0 + Duration::from_secs(1);
        let mut now = t0;
        let mut next_frame = t0;
        let mut frames = 0;
        while now < end {
            app.poll(now);
            if now >= next_frame {
                frames += 1;
                next_frame = now + frame;
            }
            now = next_wake(&app, now, next_frame);
        }

        assert_eq!(frames, 30);
        assert_eq!(app.runner().control().ticks(), 50);
    }

    #[test]
    fn error_messages() {
        let err = Error::Render(io::Error::other("broken pipe"));
        assert_eq!(err.to_string(), "render error: broken pipe");
    }
}

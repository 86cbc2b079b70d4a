//! User-facing progress reporting
//!
//! - `ConsoleUi` prints plain lines to stdout (the default)
//! - `UiApp` is a ratatui dashboard enabled with `--tui`
//! - `SilentUi` discards everything, for tests and scripted use
//!
//! Diagnostics that are not meant for the operator go through `log` instead.

mod components;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

use components::{Level, LogPanel, ProgressBoard, StepList};

/// Lifecycle steps, in the order the default mode walks them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Checking,
    Installing,
    Initializing,
    Starting,
    Seeding,
    Stopping,
    Uninstalling,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Checking => "Checking PostgreSQL",
            Phase::Installing => "Installing PostgreSQL",
            Phase::Initializing => "Initializing data directory",
            Phase::Starting => "Starting server",
            Phase::Seeding => "Seeding Pokédex",
            Phase::Stopping => "Stopping server",
            Phase::Uninstalling => "Uninstalling",
            Phase::Complete => "Complete",
        };
        f.write_str(label)
    }
}

/// Units handled so far for one item: resources of a table, KiB of the archive
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub item: String,
    pub done: u64,
    pub total: u64,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            // An empty listing is finished as soon as it is reported
            1.0
        } else {
            (self.done as f64 / self.total as f64).min(1.0)
        }
    }

    pub fn is_done(&self) -> bool {
        self.done >= self.total
    }
}

/// Reporting surface shared by the lifecycle steps and the loader.
/// Object safe so callers can pass `&mut dyn Ui`.
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);

    /// `done` of `total` units for one item. Repeated reports for the same
    /// item replace the earlier counts.
    fn progress(&mut self, item: &str, done: u64, total: u64);

    fn log(&mut self, message: &str);

    /// A failure the run survives, such as a stop that found no server
    fn warn(&mut self, message: &str) {
        self.log(message);
    }
}

/// Line-oriented console output. Per-item counts are already echoed by the
/// loader's log lines, so `progress` prints nothing.
#[derive(Default)]
pub struct ConsoleUi {
    phase: Option<Phase>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        if self.phase != Some(phase) {
            println!("\n{}...", phase);
            self.phase = Some(phase);
        }
    }

    fn progress(&mut self, _item: &str, _done: u64, _total: u64) {}

    fn log(&mut self, message: &str) {
        println!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        eprintln!("warning: {}", message);
    }
}

/// Full-screen dashboard: lifecycle steps on the left, per-table counters on
/// the right, activity log below. The terminal is restored on drop.
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    steps: StepList,
    board: ProgressBoard,
    log: LogPanel,
}

impl UiApp {
    /// Enter the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            steps: StepList::default(),
            board: ProgressBoard::default(),
            log: LogPanel::new(),
        })
    }

    fn draw(&mut self) {
        let Self {
            terminal,
            steps,
            board,
            log: activity,
        } = self;

        let drawn = terminal.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(10), Constraint::Min(5)])
                .split(frame.area());
            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(32), Constraint::Min(30)])
                .split(rows[0]);

            steps.render(frame, top[0]);
            board.render(frame, top[1]);
            activity.render(frame, rows[1]);
        });
        if let Err(err) = drawn {
            log::debug!("dashboard redraw failed: {}", err);
        }
    }

    /// Show the outcome and wait for a key
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.set_phase(Phase::Complete);
        self.log(summary);
        self.wait_for_key()
    }

    /// Mark the current step as failed, show the error and wait for a key,
    /// so the reason is readable before the screen is torn down
    pub fn fail(mut self, message: &str) -> Result<()> {
        self.steps.fail();
        self.log.push(Level::Error, message);
        self.wait_for_key()
    }

    fn wait_for_key(&mut self) -> Result<()> {
        self.log.push(Level::Info, "Press any key to exit...");
        self.draw();
        loop {
            if event::poll(Duration::from_millis(100))? {
                if let CrosstermEvent::Key(_) = event::read()? {
                    return Ok(());
                }
            }
        }
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.steps.enter(phase);
        self.draw();
    }

    fn progress(&mut self, item: &str, done: u64, total: u64) {
        self.board.update(item, done, total);
        self.draw();
    }

    fn log(&mut self, message: &str) {
        self.log.push(Level::Info, message);
        self.draw();
    }

    fn warn(&mut self, message: &str) {
        self.log.push(Level::Warn, message);
        self.draw();
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
        self.terminal
            .backend_mut()
            .execute(LeaveAlternateScreen)
            .ok();
        self.terminal.show_cursor().ok();
    }
}

#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn progress(&mut self, _item: &str, _done: u64, _total: u64) {}
    fn log(&mut self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(done: u64, total: u64) -> Progress {
        Progress {
            item: "pokemon".to_string(),
            done,
            total,
        }
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress(50, 200).ratio(), 0.25);
        assert!(!progress(50, 200).is_done());
        assert_eq!(progress(0, 0).ratio(), 1.0);
        assert!(progress(0, 0).is_done());
    }

    #[test]
    fn test_warn_defaults_to_log() {
        #[derive(Default)]
        struct Lines(Vec<String>);
        impl Ui for Lines {
            fn set_phase(&mut self, _phase: Phase) {}
            fn progress(&mut self, _item: &str, _done: u64, _total: u64) {}
            fn log(&mut self, message: &str) {
                self.0.push(message.to_string());
            }
        }

        let mut ui = Lines::default();
        ui.warn("Could not stop server");
        assert_eq!(ui.0, vec!["Could not stop server"]);
    }
}

//! Front ends that drive the engine: keyboard play, agent playback and
//! headless benchmarking

pub mod bench;
pub mod human;
pub mod watch;

pub use bench::{BenchConfig, BenchMode};
pub use human::HumanMode;
pub use watch::WatchMode;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;

use crate::game::GameConfig;

pub(crate) type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Render at 30 FPS
pub(crate) const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Tick pacing for the interactive modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// 2 Hz
    Slow,
    /// 8 Hz
    Normal,
    /// 20 Hz
    Fast,
    /// `GameConfig::speed` ticks per second
    Configured,
}

impl Pace {
    pub fn tick_interval(&self, config: &GameConfig) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::Configured => config.tick_interval(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Configured => "Full",
        }
    }
}

pub(crate) fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

pub(crate) fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

//! Terminal setup for the full-screen UI.
//!
//! Wraps crossterm's raw mode and alternate screen behind a RAII guard that
//! restores the terminal on drop.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, terminal};

/// RAII guard: raw mode plus alternate screen while alive.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        if let Err(e) = execute!(io::stdout(), terminal::EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(e).context("failed to enter alternate screen");
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best effort; nothing useful to do with a failure here.
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

/// Current terminal size as (columns, rows), falling back to (80, 24).
pub fn get_terminal_size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

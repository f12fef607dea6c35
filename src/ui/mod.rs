//! Terminal frontend: ratatui drawing over crossterm plus the input thread.

pub mod events;
mod footer;
mod header;
pub mod layout;
pub mod render;
mod terminal_guard;
mod theme;

use std::io::{self, Stdout};

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::runtime::Frontend;
use crate::state::AppState;

pub use events::{event_to_msg, key_event_to_msg, InputAdapter};
pub use terminal_guard::{setup_terminal, TerminalGuard};

/// Draws the whole screen on every render.
pub struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    // Restores the terminal when the frontend is dropped.
    _guard: TerminalGuard,
}

impl TerminalFrontend {
    /// Switch the terminal to raw mode and the alternate screen.
    pub fn enter() -> io::Result<Self> {
        let (terminal, guard) = setup_terminal()?;
        Ok(Self {
            terminal,
            _guard: guard,
        })
    }
}

impl Frontend for TerminalFrontend {
    fn render(&mut self, state: &AppState) -> io::Result<()> {
        self.terminal.draw(|frame| render::draw(frame, state))?;
        Ok(())
    }
}

//! Terminal setup and teardown for the interactive preview.

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

/// Puts the terminal into raw mode with mouse capture; restores it on drop.
#[derive(Debug)]
pub struct TerminalGuard {
    mouse: bool,
    alternate_screen: bool,
}

impl TerminalGuard {
    /// Enter raw mode, optionally the alternate screen and mouse capture.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails.
    pub fn enter(mouse: bool, alternate_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)?;

        Ok(Self {
            mouse,
            alternate_screen,
        })
    }

    /// Terminal size in cells.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}

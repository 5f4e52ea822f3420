//! The physical display surface
//!
//! `DisplaySurface` is the only way anything reaches the screen. The
//! compositor composes a full frame and hands it over in one `present`
//! call. Implementations keep their own notion of the screen size, which
//! can lag behind the real terminal right after a resize; `query_size`
//! asks the terminal directly and `renegotiate` brings the two back in line.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use crate::error::Result;
use crate::ui::{RenderBuffer, Style};

/// Terminal dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub height: u16,
    pub width: u16,
}

impl TermSize {
    pub fn new(height: u16, width: u16) -> Self {
        Self { height, width }
    }
}

impl std::fmt::Display for TermSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A character-grid display the compositor can present frames to
pub trait DisplaySurface {
    /// One-time setup before the first frame (cursor off)
    fn prepare(&mut self) -> Result<()>;

    /// Ask the terminal for its current physical size
    fn query_size(&mut self) -> Result<TermSize>;

    /// The size this surface currently believes it has
    fn current_size(&self) -> TermSize;

    /// Adopt a new size
    ///
    /// Returns `Ok(false)` if the backend cannot renegotiate; callers then
    /// rely on the next full redraw to catch up.
    fn renegotiate(&mut self, size: TermSize) -> Result<bool>;

    /// Replace the visible contents with `frame`
    fn present(&mut self, frame: &RenderBuffer) -> Result<()>;
}

/// Surface that writes ANSI output through crossterm
pub struct CrosstermSurface<W: Write> {
    out: W,
    size: TermSize,
}

impl CrosstermSurface<io::Stdout> {
    /// Surface on stdout, sized to the current terminal
    pub fn stdout() -> Result<Self> {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermSurface<W> {
    pub fn new(out: W) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(out, TermSize::new(rows, cols)))
    }

    /// Surface with a known starting size, without querying the terminal
    pub fn with_size(out: W, size: TermSize) -> Self {
        Self { out, size }
    }
}

impl<W: Write> DisplaySurface for CrosstermSurface<W> {
    fn prepare(&mut self) -> Result<()> {
        execute!(self.out, Hide, SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn query_size(&mut self) -> Result<TermSize> {
        let (cols, rows) = terminal::size()?;
        Ok(TermSize::new(rows, cols))
    }

    fn current_size(&self) -> TermSize {
        self.size
    }

    fn renegotiate(&mut self, size: TermSize) -> Result<bool> {
        debug!(from = %self.size, to = %size, "renegotiating surface size");
        self.size = size;
        // Whatever the old grid left behind is now misplaced
        execute!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    fn present(&mut self, frame: &RenderBuffer) -> Result<()> {
        if frame.width() != self.size.width || frame.height() != self.size.height {
            warn!(
                frame_width = frame.width(),
                frame_height = frame.height(),
                surface = %self.size,
                "frame size does not match surface"
            );
        }

        queue!(self.out, BeginSynchronizedUpdate, SetAttribute(Attribute::Reset))?;

        let mut current = Style::Plain;
        for (y, row) in (0u16..).zip(frame.rows()) {
            queue!(self.out, MoveTo(0, y))?;
            for cell in row {
                if cell.style != current {
                    queue!(self.out, SetAttribute(Attribute::Reset))?;
                    if cell.style != Style::Plain {
                        queue!(self.out, SetAttribute(cell.style.attribute()))?;
                    }
                    current = cell.style;
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Raw mode + alternate screen for the lifetime of the guard
///
/// Dropping the guard restores the terminal, including on early return.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            warn!("failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {}", e);
        }
    }
}

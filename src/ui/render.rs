//! Off-screen cell buffers and drawing primitives
//!
//! Everything the compositor puts on screen is first drawn into a
//! `RenderBuffer`. Every write is bounds-checked and reports what happened
//! instead of failing: painting past an edge is simply a no-op.

use crossterm::style::Attribute;

/// Text attribute for a cell
///
/// Colors are left to the terminal's default palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Style {
    #[default]
    Plain,
    Bold,
    Dim,
    Reverse,
    Underline,
}

impl Style {
    /// The crossterm attribute that renders this style
    pub fn attribute(&self) -> Attribute {
        match self {
            Style::Plain => Attribute::Reset,
            Style::Bold => Attribute::Bold,
            Style::Dim => Attribute::Dim,
            Style::Reverse => Attribute::Reverse,
            Style::Underline => Attribute::Underlined,
        }
    }
}

/// A single cell in the render buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::Plain,
        }
    }
}

impl Cell {
    pub fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

/// What a bounds-checked write actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Everything landed inside the buffer
    Written,
    /// Some of it landed, the rest fell off the edge
    Truncated,
    /// Nothing landed
    Skipped,
}

impl WriteOutcome {
    /// True if at least one cell was written
    pub fn wrote_any(&self) -> bool {
        !matches!(self, WriteOutcome::Skipped)
    }
}

/// Box drawing characters
pub struct BoxChars;

impl BoxChars {
    pub const TOP_LEFT: char = '╭';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_LEFT: char = '╰';
    pub const BOTTOM_RIGHT: char = '╯';
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
}

/// A 2D buffer of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl RenderBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get a cell (returns None if out of bounds)
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Reset every cell to a blank
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize in place, clearing the contents
    pub fn reset(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize((width as usize) * (height as usize), Cell::default());
    }

    /// Set a single cell
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: Style) -> WriteOutcome {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = Cell::new(ch, style);
                WriteOutcome::Written
            }
            None => WriteOutcome::Skipped,
        }
    }

    /// Print text starting at a position, clipped at the right edge
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> WriteOutcome {
        self.put_str_n(x, y, text, usize::MAX, style)
    }

    /// Print at most `max` characters of `text`, clipped at the right edge
    pub fn put_str_n(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        max: usize,
        style: Style,
    ) -> WriteOutcome {
        let mut written = 0usize;
        let mut dropped = false;

        for (i, ch) in text.chars().enumerate() {
            if i >= max {
                dropped = true;
                break;
            }
            let cx = match u16::try_from(i).ok().and_then(|i| x.checked_add(i)) {
                Some(cx) => cx,
                None => {
                    dropped = true;
                    break;
                }
            };
            if self.put_char(cx, y, ch, style).wrote_any() {
                written += 1;
            } else {
                dropped = true;
                break;
            }
        }

        match (written, dropped) {
            (0, true) => WriteOutcome::Skipped,
            (_, true) => WriteOutcome::Truncated,
            _ => WriteOutcome::Written,
        }
    }

    /// Fill a rectangle with a character
    pub fn fill(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        for dy in 0..h {
            for dx in 0..w {
                let (Some(cx), Some(cy)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                let _ = self.put_char(cx, cy, ch, style);
            }
        }
    }

    /// Draw a single-line box
    pub fn draw_box(&mut self, x: u16, y: u16, w: u16, h: u16, style: Style) {
        if w < 2 || h < 2 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);

        // Corners
        let _ = self.put_char(x, y, BoxChars::TOP_LEFT, style);
        let _ = self.put_char(right, y, BoxChars::TOP_RIGHT, style);
        let _ = self.put_char(x, bottom, BoxChars::BOTTOM_LEFT, style);
        let _ = self.put_char(right, bottom, BoxChars::BOTTOM_RIGHT, style);

        // Horizontal edges
        self.fill(x.saturating_add(1), y, w - 2, 1, BoxChars::HORIZONTAL, style);
        self.fill(x.saturating_add(1), bottom, w - 2, 1, BoxChars::HORIZONTAL, style);

        // Vertical edges
        self.fill(x, y.saturating_add(1), 1, h - 2, BoxChars::VERTICAL, style);
        self.fill(right, y.saturating_add(1), 1, h - 2, BoxChars::VERTICAL, style);
    }

    /// Copy another buffer in with its top-left corner at (x, y)
    ///
    /// Cells that land outside this buffer are dropped.
    pub fn blit(&mut self, x: u16, y: u16, src: &RenderBuffer) -> WriteOutcome {
        let mut written = 0usize;
        let total = src.cells.len();

        for sy in 0..src.height {
            for sx in 0..src.width {
                let (Some(cx), Some(cy)) = (x.checked_add(sx), y.checked_add(sy)) else {
                    continue;
                };
                if let (Some(dst), Some(cell)) = (self.index(cx, cy), src.get(sx, sy)) {
                    self.cells[dst] = *cell;
                    written += 1;
                }
            }
        }

        if written == total {
            WriteOutcome::Written
        } else if written == 0 {
            WriteOutcome::Skipped
        } else {
            WriteOutcome::Truncated
        }
    }

    /// Iterate over rows as slices of cells
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() rejects a zero chunk size
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// The text of one row, without styles
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch)
            .collect()
    }

    /// All rows as plain text, joined with newlines
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

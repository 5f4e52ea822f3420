//! Region geometry and the three-region layout engine
//!
//! The screen is split into a one-row header, a body, and a log strip at
//! the bottom:
//!
//! ```text
//! row 0            header   (1 row)
//! row 1            body     (>= 3 rows)
//! row 1 + body     log      (3..=7 rows)
//! ```
//!
//! The layout is a pure function of the terminal size and is recomputed on
//! every frame. Nothing about a previous layout survives a resize.

use tracing::debug;

/// Header is always a single row
pub const HEADER_HEIGHT: u16 = 1;
/// Smallest log strip for a normal-sized terminal
pub const LOG_MIN_HEIGHT: u16 = 3;
/// Largest log strip
pub const LOG_MAX_HEIGHT: u16 = 7;
/// Body floor for a normal-sized terminal
pub const BODY_MIN_HEIGHT: u16 = 3;
/// Rows reserved for header + body before the log strip starts growing
const LOG_GROWTH_OFFSET: u16 = 5;

/// A rectangular area of the terminal, in cells
///
/// Height and width are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub top: u16,
    pub left: u16,
    pub height: u16,
    pub width: u16,
}

impl Region {
    /// Create a region; zero sizes are raised to 1
    pub fn new(top: u16, left: u16, height: u16, width: u16) -> Self {
        Self {
            top,
            left,
            height: height.max(1),
            width: width.max(1),
        }
    }

    /// Width usable for text, keeping the last column free
    pub fn printable_width(&self) -> u16 {
        self.width.saturating_sub(1)
    }

    /// Row just past the bottom edge
    pub fn bottom(&self) -> u16 {
        self.top.saturating_add(self.height)
    }

    /// Column just past the right edge
    pub fn right(&self) -> u16 {
        self.left.saturating_add(self.width)
    }

    /// Check if this region contains a cell
    pub fn contains(&self, row: u16, col: u16) -> bool {
        row >= self.top && row < self.bottom() && col >= self.left && col < self.right()
    }

    /// Interior size once a one-cell border is taken off each side
    ///
    /// Returns `(height, width)`; either may be zero.
    pub fn interior(&self) -> (u16, u16) {
        (self.height.saturating_sub(2), self.width.saturating_sub(2))
    }
}

/// The header / body / log triple for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub header: Region,
    pub body: Region,
    pub log: Region,
}

impl Layout {
    /// Compute the layout for a terminal of the given size
    ///
    /// For 7 rows and up:
    /// `log = clamp(rows - 5, 3, 7)` and `body = max(3, rows - 1 - log)`,
    /// which always sums exactly. Between 3 and 6 rows the body gives up
    /// rows first, then the log, so the sum stays exact and every region
    /// keeps one row. Below 3 rows the body and log get one row each at
    /// rows 1 and 2; whatever is past the bottom edge is clipped at flush.
    pub fn compute(term_height: u16, term_width: u16) -> Self {
        let term_height = term_height.max(1);
        let width = term_width.max(1);

        let floor = HEADER_HEIGHT + BODY_MIN_HEIGHT + LOG_MIN_HEIGHT;

        let (body_height, log_height) = if term_height >= floor {
            let log = clamp(
                term_height.saturating_sub(LOG_GROWTH_OFFSET),
                LOG_MIN_HEIGHT,
                LOG_MAX_HEIGHT,
            );
            let body = (term_height - HEADER_HEIGHT - log).max(BODY_MIN_HEIGHT);
            (body, log)
        } else if term_height >= 3 {
            let log = LOG_MIN_HEIGHT.min(term_height - 2);
            let body = term_height - HEADER_HEIGHT - log;
            debug!(term_height, body, log, "terminal below layout floor, shrinking regions");
            (body, log)
        } else {
            debug!(term_height, "terminal too short for body and log");
            (1, 1)
        };

        let header = Region::new(0, 0, HEADER_HEIGHT, width);
        let body = Region::new(header.bottom(), 0, body_height, width);
        let log = Region::new(body.bottom(), 0, log_height, width);

        Self { header, body, log }
    }

    /// Regions in drawing order, with their names
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Region)> {
        [("header", self.header), ("body", self.body), ("log", self.log)].into_iter()
    }

    /// Total rows covered by the three regions
    pub fn total_height(&self) -> u16 {
        self.header.height + self.body.height + self.log.height
    }
}

/// Compute the layout for a terminal of the given size
pub fn compute_layout(term_height: u16, term_width: u16) -> Layout {
    Layout::compute(term_height, term_width)
}

fn clamp(x: u16, lo: u16, hi: u16) -> u16 {
    lo.max(x.min(hi))
}

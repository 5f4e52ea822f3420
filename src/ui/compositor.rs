//! Staged drawing with a single atomic flush
//!
//! Regions are drawn into their own off-screen buffers first. `flush`
//! composes them into one full-screen frame and presents that frame in a
//! single call, so a half-drawn screen is never visible. Nothing touches
//! the surface between flushes.

use tracing::{debug, trace};

use super::layout::Region;
use super::render::{RenderBuffer, Style};
use crate::error::Result;
use crate::terminal::DisplaySurface;

/// Draw a border around the buffer's outer edge, with an optional title
///
/// The title is padded as `" title "` and centered on the top row; if it
/// is wider than the buffer it starts at column 0 and is cut at the edge.
pub fn draw_frame(buf: &mut RenderBuffer, title: Option<&str>, style: Style) {
    buf.draw_box(0, 0, buf.width(), buf.height(), style);

    if let Some(title) = title {
        let label = format!(" {} ", title);
        let label_len = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
        let x = buf.width().saturating_sub(label_len) / 2;
        let _ = buf.put_str(x, 0, &label, style);
    }
}

/// A region and the buffer drawn for it
struct Staged {
    region: Region,
    buffer: RenderBuffer,
}

/// Owns the display surface and the buffers staged for the next frame
pub struct Compositor<S> {
    surface: S,
    staged: Vec<Staged>,
    /// Buffers from earlier frames, reused by `stage_region`
    pool: Vec<RenderBuffer>,
    frame: RenderBuffer,
    flushes: u64,
}

impl<S: DisplaySurface> Compositor<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            staged: Vec::new(),
            pool: Vec::new(),
            frame: RenderBuffer::new(0, 0),
            flushes: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Number of regions waiting for the next flush
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Number of completed flushes
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// The last frame handed to the surface
    pub fn last_frame(&self) -> &RenderBuffer {
        &self.frame
    }

    /// Draw into a fresh buffer sized to `region`, to be shown on the next flush
    pub fn stage_region<F>(&mut self, region: Region, draw: F)
    where
        F: FnOnce(&mut RenderBuffer),
    {
        let mut buffer = self.take_buffer(region.width, region.height);
        draw(&mut buffer);
        self.staged.push(Staged { region, buffer });
    }

    fn take_buffer(&mut self, width: u16, height: u16) -> RenderBuffer {
        if let Some(pos) = self
            .pool
            .iter()
            .position(|b| b.width() == width && b.height() == height)
        {
            let mut buffer = self.pool.swap_remove(pos);
            buffer.clear();
            buffer
        } else if let Some(mut buffer) = self.pool.pop() {
            buffer.reset(width, height);
            buffer
        } else {
            RenderBuffer::new(width, height)
        }
    }

    /// Compose everything staged and present it as one frame
    ///
    /// Regions are composed in staging order onto a blank frame the size
    /// of the surface. Parts of a region past the surface edge are dropped.
    pub fn flush(&mut self) -> Result<()> {
        let size = self.surface.current_size();
        self.frame.reset(size.width, size.height);

        for staged in self.staged.drain(..) {
            let outcome = self
                .frame
                .blit(staged.region.left, staged.region.top, &staged.buffer);
            if !matches!(outcome, super::render::WriteOutcome::Written) {
                debug!(region = ?staged.region, ?outcome, "region clipped to surface");
            }
            self.pool.push(staged.buffer);
        }

        self.surface.present(&self.frame)?;
        self.flushes += 1;
        trace!(flush = self.flushes, %size, "frame presented");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySurface;

    #[test]
    fn test_draw_frame_centers_title() {
        let mut buf = RenderBuffer::new(11, 3);
        draw_frame(&mut buf, Some("ab"), Style::Plain);
        // " ab " is 4 wide, (11 - 4) / 2 = 3
        assert_eq!(buf.row_text(0), "╭── ab ───╮");
        assert_eq!(buf.row_text(2), "╰─────────╯");
    }

    #[test]
    fn test_draw_frame_without_title() {
        let mut buf = RenderBuffer::new(4, 2);
        draw_frame(&mut buf, None, Style::Plain);
        assert_eq!(buf.to_text(), "╭──╮\n╰──╯");
    }

    #[test]
    fn test_draw_frame_title_wider_than_buffer() {
        let mut buf = RenderBuffer::new(5, 3);
        draw_frame(&mut buf, Some("a long title"), Style::Plain);
        assert_eq!(buf.row_text(0), " a lo");
        assert_eq!(buf.row_text(1), "│   │");
    }

    #[test]
    fn test_stage_is_invisible_until_flush() {
        let surface = MemorySurface::new(4, 10);
        let probe = surface.clone();
        let mut comp = Compositor::new(surface);

        comp.stage_region(Region::new(0, 0, 1, 10), |buf| {
            let _ = buf.put_str(0, 0, "hello", Style::Plain);
        });

        assert_eq!(comp.staged_len(), 1);
        assert_eq!(probe.present_count(), 0);
        assert_eq!(probe.visible_row(0), "          ");

        comp.flush().unwrap();

        assert_eq!(comp.staged_len(), 0);
        assert_eq!(probe.present_count(), 1);
        assert_eq!(probe.visible_row(0), "hello     ");
    }

    #[test]
    fn test_flush_composes_regions_in_one_present() {
        let surface = MemorySurface::new(3, 4);
        let probe = surface.clone();
        let mut comp = Compositor::new(surface);

        // Staged out of screen order on purpose
        comp.stage_region(Region::new(2, 0, 1, 4), |buf| {
            let _ = buf.put_str(0, 0, "cccc", Style::Plain);
        });
        comp.stage_region(Region::new(0, 0, 2, 4), |buf| {
            buf.fill(0, 0, 4, 2, 'a', Style::Plain);
        });
        comp.flush().unwrap();

        assert_eq!(probe.present_count(), 1);
        assert_eq!(probe.visible_text(), "aaaa\naaaa\ncccc");
    }

    #[test]
    fn test_flush_clips_region_past_surface() {
        let surface = MemorySurface::new(2, 4);
        let probe = surface.clone();
        let mut comp = Compositor::new(surface);

        comp.stage_region(Region::new(1, 2, 3, 5), |buf| {
            buf.fill(0, 0, 5, 3, '#', Style::Plain);
        });
        comp.stage_region(Region::new(9, 0, 1, 4), |buf| {
            buf.fill(0, 0, 4, 1, '!', Style::Plain);
        });
        comp.flush().unwrap();

        assert_eq!(probe.visible_text(), "    \n  ##");
    }

    #[test]
    fn test_empty_flush_blanks_screen() {
        let surface = MemorySurface::new(1, 3);
        let probe = surface.clone();
        let mut comp = Compositor::new(surface);

        comp.stage_region(Region::new(0, 0, 1, 3), |buf| {
            let _ = buf.put_str(0, 0, "xyz", Style::Plain);
        });
        comp.flush().unwrap();
        comp.flush().unwrap();

        assert_eq!(probe.present_count(), 2);
        assert_eq!(probe.visible_row(0), "   ");
    }

    #[test]
    fn test_buffers_are_reused() {
        let mut comp = Compositor::new(MemorySurface::new(5, 5));
        let region = Region::new(0, 0, 2, 2);

        comp.stage_region(region, |buf| buf.fill(0, 0, 2, 2, 'x', Style::Plain));
        comp.flush().unwrap();

        // Reused buffer starts out blank
        comp.stage_region(region, |buf| {
            assert_eq!(buf.to_text(), "  \n  ");
        });
        assert_eq!(comp.pool.len(), 0);
    }
}

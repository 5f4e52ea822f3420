//! In-memory display surface
//!
//! Clones share the same screen, so a test can keep a probe while the
//! compositor owns the surface. The physical size and the surface's own
//! idea of its size are tracked separately to model backends that report a
//! resize before their buffers catch up.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::terminal::{DisplaySurface, TermSize};
use crate::ui::RenderBuffer;

struct Screen {
    physical: TermSize,
    internal: TermSize,
    renegotiable: bool,
    prepared: bool,
    renegotiations: usize,
    visible: RenderBuffer,
    history: Vec<RenderBuffer>,
}

/// Shared in-memory screen implementing `DisplaySurface`
#[derive(Clone)]
pub struct MemorySurface {
    screen: Arc<Mutex<Screen>>,
}

impl MemorySurface {
    /// A blank screen of `height` rows by `width` columns
    pub fn new(height: u16, width: u16) -> Self {
        let size = TermSize::new(height, width);
        Self {
            screen: Arc::new(Mutex::new(Screen {
                physical: size,
                internal: size,
                renegotiable: true,
                prepared: false,
                renegotiations: 0,
                visible: RenderBuffer::new(width, height),
                history: Vec::new(),
            })),
        }
    }

    /// Make `renegotiate` report that the backend can't change size
    pub fn without_renegotiation(self) -> Self {
        self.lock().renegotiable = false;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Change the physical terminal size; the surface's own size lags behind
    pub fn resize_physical(&self, height: u16, width: u16) {
        self.lock().physical = TermSize::new(height, width);
    }

    /// Whether `prepare` has run
    pub fn is_prepared(&self) -> bool {
        self.lock().prepared
    }

    /// Number of frames presented so far
    pub fn present_count(&self) -> usize {
        self.lock().history.len()
    }

    /// Number of successful renegotiations
    pub fn renegotiation_count(&self) -> usize {
        self.lock().renegotiations
    }

    /// One visible row as plain text (empty if out of range)
    pub fn visible_row(&self, y: u16) -> String {
        self.lock().visible.row_text(y)
    }

    /// The whole visible screen as plain text
    pub fn visible_text(&self) -> String {
        self.lock().visible.to_text()
    }

    /// A copy of every presented frame, oldest first
    pub fn frames(&self) -> Vec<RenderBuffer> {
        self.lock().history.clone()
    }
}

impl DisplaySurface for MemorySurface {
    fn prepare(&mut self) -> Result<()> {
        self.lock().prepared = true;
        Ok(())
    }

    fn query_size(&mut self) -> Result<TermSize> {
        Ok(self.lock().physical)
    }

    fn current_size(&self) -> TermSize {
        self.lock().internal
    }

    fn renegotiate(&mut self, size: TermSize) -> Result<bool> {
        let mut screen = self.lock();
        if !screen.renegotiable {
            return Ok(false);
        }
        screen.internal = size;
        screen.renegotiations += 1;
        Ok(true)
    }

    fn present(&mut self, frame: &RenderBuffer) -> Result<()> {
        let mut screen = self.lock();
        screen.visible = frame.clone();
        screen.history.push(frame.clone());
        Ok(())
    }
}

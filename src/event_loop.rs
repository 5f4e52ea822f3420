//! The redraw loop and resize protocol
//!
//! Every pass through the loop recomputes the layout from the terminal's
//! current size, stages the header, body and log regions, flushes them as
//! one frame, and then blocks for the next event. Nothing from the previous
//! frame is trusted: some terminals change size without telling us.
//!
//! ```text
//!            ┌──────── AppendLog / Other ────────┐
//!            v                                   │
//! init ──> Idle ──(redraw, wait)──> event ───────┤
//!            ^                                   │
//!            └── Resizing <──── Resize ──────────┘
//!                                 Quit ──> Terminating
//! ```
//!
//! Single-threaded: the loop owns the surface and the scrollback. Hosts
//! that append from other threads go through a queue feeding the event
//! source (see `input::LogSender`).

use tracing::{debug, info};

use crate::config::Config;
use crate::display::{render_into, EntryId, RenderConfig, ScrollbackBuffer};
use crate::error::Result;
use crate::terminal::{DisplaySurface, TermSize};
use crate::ui::{draw_frame, Compositor, Layout, Style};

/// A decoded input, as delivered by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Stop the loop
    Quit,
    /// The terminal size may have changed
    Resize,
    /// Add a line to the scrollback
    AppendLog(String),
    /// Anything else; forwarded to the dispatcher untouched
    Other(String),
}

/// Where the loop gets its input from
pub trait EventSource {
    /// Block until the next event arrives
    fn wait_for_event(&mut self) -> Result<Event>;
}

/// Handler for actions the loop doesn't know about
pub trait Dispatch {
    fn dispatch(&mut self, action: &str);
}

impl<F: FnMut(&str)> Dispatch for F {
    fn dispatch(&mut self, action: &str) {
        self(action)
    }
}

/// Dispatcher that drops every action
#[derive(Debug, Clone, Copy, Default)]
pub struct Unhandled;

impl Dispatch for Unhandled {
    fn dispatch(&mut self, action: &str) {
        debug!(action, "no handler for action");
    }
}

/// Where the loop is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Frame is up to date, waiting for input
    Idle,
    /// Handling a resize signal
    Resizing,
    /// Quit received; the loop exits at the top of the next pass
    Terminating,
}

/// Everything the loop owns
pub struct LoopHandle<S> {
    compositor: Compositor<S>,
    scrollback: ScrollbackBuffer,
    header_text: String,
    body_title: String,
    log_config: RenderConfig,
    state: LoopState,
    layout: Layout,
    size: TermSize,
}

impl<S: DisplaySurface> LoopHandle<S> {
    /// Take over the surface: hide the cursor and set up the scrollback
    pub fn initialize(mut surface: S, config: &Config) -> Result<Self> {
        surface.prepare()?;
        let size = surface.current_size();

        Ok(Self {
            compositor: Compositor::new(surface),
            scrollback: ScrollbackBuffer::new(config.scrollback_capacity),
            header_text: config.header_text.clone(),
            body_title: config.body_title.clone(),
            log_config: config.log_render_config(),
            state: LoopState::Idle,
            layout: Layout::compute(size.height, size.width),
            size,
        })
    }

    /// Append a line to the scrollback
    ///
    /// Call only from the loop's own thread; other threads go through the
    /// event source queue.
    pub fn append_log_entry(&mut self, text: impl Into<String>) -> EntryId {
        let id = self.scrollback.append(text);
        debug!(id = id.0, retained = self.scrollback.len(), "log entry appended");
        id
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Layout used for the most recent frame
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Terminal size used for the most recent frame
    pub fn size(&self) -> TermSize {
        self.size
    }

    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.scrollback
    }

    pub fn compositor(&self) -> &Compositor<S> {
        &self.compositor
    }

    /// Run until `Quit`
    ///
    /// Each pass redraws everything, then blocks for one event. Errors only
    /// come from the surface or the event source.
    pub fn run_loop<E, D>(&mut self, events: &mut E, dispatch: &mut D) -> Result<()>
    where
        E: EventSource,
        D: Dispatch,
    {
        info!(size = %self.size, "event loop started");

        while self.state != LoopState::Terminating {
            self.redraw()?;
            let event = events.wait_for_event()?;
            self.handle_event(event, dispatch)?;
        }

        info!(
            frames = self.compositor.flush_count(),
            entries = self.scrollback.total_appended(),
            "event loop finished"
        );
        Ok(())
    }

    /// Apply one event to the loop state
    pub fn handle_event<D: Dispatch>(&mut self, event: Event, dispatch: &mut D) -> Result<LoopState> {
        match event {
            Event::Quit => {
                debug!("quit requested");
                self.state = LoopState::Terminating;
            }
            Event::Resize => {
                self.handle_resize()?;
                self.state = LoopState::Idle;
            }
            Event::AppendLog(text) => {
                self.append_log_entry(text);
                self.state = LoopState::Idle;
            }
            Event::Other(action) => {
                dispatch.dispatch(&action);
                self.state = LoopState::Idle;
            }
        }
        Ok(self.state)
    }

    /// Query the terminal and renegotiate if the surface is behind
    fn handle_resize(&mut self) -> Result<()> {
        self.state = LoopState::Resizing;

        let surface = self.compositor.surface_mut();
        let queried = surface.query_size()?;
        let believed = surface.current_size();

        if queried == believed {
            debug!(size = %queried, "resize signal with no size change");
            return Ok(());
        }

        if surface.renegotiate(queried)? {
            info!(from = %believed, to = %queried, "terminal resized");
        } else {
            debug!(
                from = %believed,
                to = %queried,
                "surface cannot renegotiate, relying on next redraw"
            );
        }
        Ok(())
    }

    /// Full frame: layout, stage all three regions, flush
    pub fn redraw(&mut self) -> Result<Layout> {
        let size = self.compositor.surface_mut().query_size()?;
        let layout = Layout::compute(size.height, size.width);

        let header_text = &self.header_text;
        self.compositor.stage_region(layout.header, |buf| {
            let max = layout.header.printable_width() as usize;
            let _ = buf.put_str_n(0, 0, header_text, max, Style::Bold);
        });

        let body_title = &self.body_title;
        let status = [
            format!("terminal size (W*H): {} x {}", size.width, size.height),
            format!(
                "log entries: {}/{}",
                self.scrollback.len(),
                self.scrollback.capacity()
            ),
        ];
        self.compositor.stage_region(layout.body, |buf| {
            let (_, inner_width) = layout.body.interior();
            draw_frame(buf, Some(body_title.as_str()), Style::Plain);
            for (row, line) in (1u16..).zip(status.iter()) {
                if row + 1 >= buf.height() {
                    break;
                }
                let _ = buf.put_str_n(1, row, line, inner_width as usize, Style::Plain);
            }
        });

        let scrollback = &self.scrollback;
        let log_config = &self.log_config;
        self.compositor.stage_region(layout.log, |buf| {
            render_into(scrollback, buf, log_config);
        });

        self.compositor.flush()?;

        self.layout = layout;
        self.size = size;
        self.state = LoopState::Idle;
        Ok(layout)
    }
}

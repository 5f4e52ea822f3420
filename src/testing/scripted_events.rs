//! Scripted event source
//!
//! Replays a fixed list of steps. A resize step changes the physical size
//! of a `MemorySurface` right before the loop sees the resize event, the
//! same order a real terminal uses.

use std::collections::VecDeque;

use super::MemorySurface;
use crate::error::{Error, Result};
use crate::event_loop::{Event, EventSource};

/// One scripted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Deliver this event as-is
    Event(Event),
    /// Resize the surface to (height, width), then deliver `Event::Resize`
    Resize(u16, u16),
}

/// Event source that replays steps, then reports itself closed
pub struct ScriptedEvents {
    steps: VecDeque<Step>,
    surface: Option<MemorySurface>,
    delivered: usize,
}

impl ScriptedEvents {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            surface: None,
            delivered: 0,
        }
    }

    /// Replay plain events
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        Self::new(events.into_iter().map(Step::Event))
    }

    /// Surface that `Step::Resize` acts on
    pub fn with_surface(mut self, surface: MemorySurface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Number of events handed out so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Steps not yet delivered
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl EventSource for ScriptedEvents {
    fn wait_for_event(&mut self) -> Result<Event> {
        let step = self.steps.pop_front().ok_or(Error::EventSourceClosed)?;
        self.delivered += 1;

        match step {
            Step::Event(event) => Ok(event),
            Step::Resize(height, width) => {
                if let Some(surface) = &self.surface {
                    surface.resize_physical(height, width);
                }
                Ok(Event::Resize)
            }
        }
    }
}

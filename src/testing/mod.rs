//! Testing utilities for rogui
//!
//! In-memory stand-ins for the terminal and the input stream, so the event
//! loop can be driven end to end without a tty.

mod memory_surface;
mod scripted_events;

pub use memory_surface::MemorySurface;
pub use scripted_events::{ScriptedEvents, Step};

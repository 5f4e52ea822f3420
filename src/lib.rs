//! rogui - minimal terminal UI runtime
//!
//! Splits the terminal into a header row, a body region and a bounded log
//! region, and redraws all three as one atomic frame every time through the
//! event loop. The binary in `main.rs` wires it to a real terminal.

pub mod config;
pub mod display;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod terminal;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod ui;

pub use error::{Error, Result};
pub use event_loop::{Dispatch, Event, EventSource, LoopHandle, LoopState, Unhandled};
pub use terminal::{DisplaySurface, TermSize};

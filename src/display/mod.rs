//! Scrollback log: storage, wrapping, and the tail-view renderer
//!
//! The buffer stores raw entries, the renderer formats them. Rendering is
//! read-only, so the same buffer can be drawn into any region size.

mod renderer;
mod scrollback;
mod wrap;

pub use renderer::{render_into, tail_lines, RenderConfig};
pub use scrollback::{EntryId, LogEntry, ScrollbackBuffer, DEFAULT_CAPACITY};
pub use wrap::wrap_text;

//! Screen geometry, cell buffers, and the compositor
//!
//! # Modules
//!
//! - `layout` - Region type and the header/body/log layout engine
//! - `render` - RenderBuffer, cell styles, bounds-checked writes
//! - `compositor` - Staged region drawing and atomic flush

pub mod compositor;
pub mod layout;
pub mod render;

pub use compositor::{draw_frame, Compositor};
pub use layout::{compute_layout, Layout, Region};
pub use render::{BoxChars, Cell, RenderBuffer, Style, WriteOutcome};

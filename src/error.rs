//! Error types for surface and event-source operations.
//!
//! Geometry problems (tiny terminals, writes past a region edge) are never
//! errors: they are absorbed where they happen. What remains are failures of
//! the devices the shell hands us.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("event source closed")]
    EventSourceClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

//! Bounded in-memory log history
//!
//! Raw entries only, no formatting. When the buffer is full the oldest
//! entry is evicted, so memory stays bounded by `capacity` entries however
//! long the session runs.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::trace;

/// Unique identifier for a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

/// A single logged line
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 500;

/// FIFO log store with a hard ceiling on retained entries
#[derive(Debug, Clone)]
pub struct ScrollbackBuffer {
    entries: VecDeque<LogEntry>,
    next_id: u64,
    capacity: usize,
}

impl Default for ScrollbackBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ScrollbackBuffer {
    /// Create a buffer holding at most `capacity` entries (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            next_id: 0,
            capacity,
        }
    }

    /// Append an entry at the newest end, evicting the oldest if full
    pub fn append(&mut self, text: impl Into<String>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        self.entries.push_back(LogEntry {
            id,
            timestamp: Utc::now(),
            text: text.into(),
        });

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                trace!(id = evicted.id.0, "evicted oldest scrollback entry");
            }
        }

        id
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries ever appended, including evicted ones
    pub fn total_appended(&self) -> u64 {
        self.next_id
    }

    /// Entries oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The newest entry
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Get a retained entry by ID
    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        // IDs are dense and increasing, so the offset from the oldest is the index
        let oldest = self.entries.front()?.id.0;
        let idx = usize::try_from(id.0.checked_sub(oldest)?).ok()?;
        self.entries.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buf: &ScrollbackBuffer) -> Vec<String> {
        buf.iter().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn test_append_assigns_ids() {
        let mut buf = ScrollbackBuffer::new(10);
        let id1 = buf.append("first");
        let id2 = buf.append("second");

        assert_eq!(id1, EntryId(0));
        assert_eq!(id2, EntryId(1));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.last().unwrap().text, "second");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut buf = ScrollbackBuffer::new(3);
        for i in 1..=4 {
            buf.append(i.to_string());
        }

        assert_eq!(buf.len(), 3);
        assert_eq!(texts(&buf), vec!["2", "3", "4"]);
        assert_eq!(buf.total_appended(), 4);
    }

    #[test]
    fn test_501_into_500() {
        let mut buf = ScrollbackBuffer::new(500);
        for i in 1..=501 {
            buf.append(format!("entry #{}", i));
        }

        assert_eq!(buf.len(), 500);
        assert_eq!(buf.iter().next().unwrap().text, "entry #2");
        assert_eq!(buf.last().unwrap().text, "entry #501");
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buf = ScrollbackBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
        buf.append("a");
        buf.append("b");
        assert_eq!(texts(&buf), vec!["b"]);
    }

    #[test]
    fn test_get_by_id() {
        let mut buf = ScrollbackBuffer::new(2);
        let a = buf.append("a");
        let b = buf.append("b");
        let c = buf.append("c");

        assert!(buf.get(a).is_none());
        assert_eq!(buf.get(b).unwrap().text, "b");
        assert_eq!(buf.get(c).unwrap().text, "c");
        assert!(buf.get(EntryId(99)).is_none());
    }

    #[test]
    fn test_empty_buffer() {
        let buf = ScrollbackBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
        assert!(buf.last().is_none());
        assert!(buf.get(EntryId(0)).is_none());
    }
}

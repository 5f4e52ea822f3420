//! Terminal input for the event loop
//!
//! `KeyDecoder` turns crossterm events into loop events. `CrosstermEvents`
//! feeds the loop from the keyboard and from a queue that other threads
//! append through with a `LogSender`.

use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use flume::{Receiver, Sender, TryRecvError};
use tracing::{debug, trace};

use crate::error::Result;
use crate::event_loop::{Event, EventSource};

/// Maps raw terminal events to loop events
#[derive(Debug, Default)]
pub struct KeyDecoder {
    appended: u64,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one terminal event; `None` for events the loop ignores
    pub fn decode(&mut self, event: &TermEvent) -> Option<Event> {
        match event {
            TermEvent::Key(key) => self.decode_key(key),
            TermEvent::Resize(..) => Some(Event::Resize),
            _ => None,
        }
    }

    fn decode_key(&mut self, key: &KeyEvent) -> Option<Event> {
        // Some platforms report release and repeat too
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Event::Quit),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Event::Quit),
            KeyCode::Char('l') | KeyCode::Enter if !ctrl => {
                self.appended += 1;
                Some(Event::AppendLog(format!("log entry #{}", self.appended)))
            }
            _ => describe_key(key).map(Event::Other),
        }
    }
}

/// Short name for a key, e.g. `char:x`, `ctrl:a`, `f5`
fn describe_key(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => format!("ctrl:{}", c),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => format!("alt:{}", c),
        KeyCode::Char(c) => format!("char:{}", c),
        KeyCode::F(n) => format!("f{}", n),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        _ => return None,
    };
    Some(name)
}

/// Create a queue for appending log entries from other threads
pub fn log_channel() -> (LogSender, Receiver<String>) {
    let (tx, rx) = flume::unbounded();
    (LogSender { tx }, rx)
}

/// Thread-safe handle for appending to the loop's scrollback
///
/// Entries land in the order they're sent and show up on the loop's next
/// pass, within one poll interval.
#[derive(Debug, Clone)]
pub struct LogSender {
    tx: Sender<String>,
}

impl LogSender {
    /// Queue an entry; returns false once the loop has gone away
    pub fn append(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }
}

/// Event source reading the real terminal
pub struct CrosstermEvents {
    decoder: KeyDecoder,
    queue: Receiver<String>,
    poll_interval: Duration,
}

impl CrosstermEvents {
    pub fn new(queue: Receiver<String>, poll_interval: Duration) -> Self {
        Self {
            decoder: KeyDecoder::new(),
            queue,
            poll_interval,
        }
    }
}

impl EventSource for CrosstermEvents {
    fn wait_for_event(&mut self) -> Result<Event> {
        loop {
            match self.queue.try_recv() {
                Ok(text) => return Ok(Event::AppendLog(text)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }

            if !event::poll(self.poll_interval)? {
                continue;
            }

            let raw = event::read()?;
            match self.decoder.decode(&raw) {
                Some(event) => {
                    trace!(?event, "decoded input");
                    return Ok(event);
                }
                None => debug!(?raw, "ignored terminal event"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> TermEvent {
        TermEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_quit_keys() {
        let mut decoder = KeyDecoder::new();
        for event in [key(KeyCode::Char('q')), key(KeyCode::Char('Q')), key(KeyCode::Esc), ctrl('c')] {
            assert_eq!(decoder.decode(&event), Some(Event::Quit));
        }
    }

    #[test]
    fn test_resize() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(&TermEvent::Resize(40, 10)), Some(Event::Resize));
    }

    #[test]
    fn test_append_keys_number_entries() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(
            decoder.decode(&key(KeyCode::Char('l'))),
            Some(Event::AppendLog("log entry #1".into()))
        );
        assert_eq!(
            decoder.decode(&key(KeyCode::Enter)),
            Some(Event::AppendLog("log entry #2".into()))
        );
    }

    #[test]
    fn test_other_keys_described() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(&key(KeyCode::Char('x'))), Some(Event::Other("char:x".into())));
        assert_eq!(decoder.decode(&ctrl('l')), Some(Event::Other("ctrl:l".into())));
        assert_eq!(decoder.decode(&key(KeyCode::F(5))), Some(Event::Other("f5".into())));
        assert_eq!(decoder.decode(&key(KeyCode::Up)), Some(Event::Other("up".into())));
    }

    #[test]
    fn test_ignored_events() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(&TermEvent::FocusGained), None);
        assert_eq!(decoder.decode(&TermEvent::Paste("hi".into())), None);

        let release = KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(decoder.decode(&TermEvent::Key(release)), None);
    }

    #[test]
    fn test_log_sender_preserves_order() {
        let (sender, rx) = log_channel();
        let other = sender.clone();
        assert!(sender.append("a"));
        assert!(other.append("b"));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["a", "b"]);

        drop(rx);
        assert!(!sender.append("c"));
    }

    #[test]
    fn test_queued_entries_come_first() {
        let (sender, rx) = log_channel();
        sender.append("from host");
        let mut events = CrosstermEvents::new(rx, Duration::from_millis(1));
        assert_eq!(
            events.wait_for_event().unwrap(),
            Event::AppendLog("from host".into())
        );
    }
}

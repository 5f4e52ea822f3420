//! Rendering the scrollback into a framed region
//!
//! Entries are re-wrapped to the current interior width on every render;
//! nothing is cached, so a width change takes effect on the next frame.

use chrono::Local;

use super::scrollback::{LogEntry, ScrollbackBuffer};
use super::wrap::wrap_text;
use crate::ui::{draw_frame, RenderBuffer, Style};

/// Configuration for rendering the log region
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Label centered on the top border
    pub title: String,
    /// Prefix each entry with its local time of day
    pub show_timestamps: bool,
    /// Style for the border and title
    pub border_style: Style,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "log".to_string(),
            show_timestamps: false,
            border_style: Style::Plain,
        }
    }
}

/// The display text for one entry, before wrapping
fn entry_text(entry: &LogEntry, config: &RenderConfig) -> String {
    let text: String = entry
        .text
        .chars()
        .map(|c| if c.is_control() && !c.is_whitespace() { '\u{fffd}' } else { c })
        .collect();

    if config.show_timestamps {
        let clock = entry.timestamp.with_timezone(&Local).format("%H:%M:%S");
        format!("{} {}", clock, text)
    } else {
        text
    }
}

/// The last `height` display lines of the scrollback wrapped to `width`
///
/// Equivalent to wrapping every entry, concatenating the results oldest to
/// newest, and keeping the suffix. Entries are walked newest first so only
/// the ones that can still be seen get wrapped.
pub fn tail_lines(
    scrollback: &ScrollbackBuffer,
    width: usize,
    height: usize,
    config: &RenderConfig,
) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut tail: Vec<String> = Vec::with_capacity(height);
    for entry in scrollback.iter().rev() {
        let wrapped = wrap_text(&entry_text(entry, config), width);
        for line in wrapped.into_iter().rev() {
            tail.push(line);
            if tail.len() == height {
                tail.reverse();
                return tail;
            }
        }
    }

    tail.reverse();
    tail
}

/// Draw the framed log view into a region-sized buffer
///
/// Interior is the buffer less a one-cell border. Returns how many lines
/// were written. Buffers too small for an interior get at most the frame.
pub fn render_into(
    scrollback: &ScrollbackBuffer,
    buf: &mut RenderBuffer,
    config: &RenderConfig,
) -> usize {
    let inner_height = buf.height().saturating_sub(2);
    let inner_width = buf.width().saturating_sub(2);

    draw_frame(buf, Some(config.title.as_str()), config.border_style);

    let lines = tail_lines(
        scrollback,
        inner_width as usize,
        inner_height as usize,
        config,
    );

    let mut written = 0;
    for (row, line) in (1u16..).zip(lines.iter()) {
        if buf
            .put_str_n(1, row, line, inner_width as usize, Style::Plain)
            .wrote_any()
        {
            written += 1;
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(entries: &[&str]) -> ScrollbackBuffer {
        let mut buf = ScrollbackBuffer::new(100);
        for e in entries {
            buf.append(*e);
        }
        buf
    }

    #[test]
    fn test_tail_shows_newest_lines() {
        let sb = buffer_with(&["one", "two", "three", "four"]);
        let lines = tail_lines(&sb, 10, 2, &RenderConfig::default());
        assert_eq!(lines, vec!["three", "four"]);
    }

    #[test]
    fn test_tail_shorter_than_viewport() {
        let sb = buffer_with(&["one", "two"]);
        let lines = tail_lines(&sb, 10, 5, &RenderConfig::default());
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_tail_splits_wrapped_entry() {
        let sb = buffer_with(&["old", "aaaa bbbb cccc"]);
        let lines = tail_lines(&sb, 4, 2, &RenderConfig::default());
        assert_eq!(lines, vec!["bbbb", "cccc"]);
    }

    #[test]
    fn test_tail_of_200_char_entry() {
        let long = "z".repeat(200);
        let sb = buffer_with(&[long.as_str()]);
        let lines = tail_lines(&sb, 20, 5, &RenderConfig::default());
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
        assert_eq!(lines.concat(), "z".repeat(100));
    }

    #[test]
    fn test_tail_zero_sized() {
        let sb = buffer_with(&["one"]);
        assert!(tail_lines(&sb, 0, 5, &RenderConfig::default()).is_empty());
        assert!(tail_lines(&sb, 5, 0, &RenderConfig::default()).is_empty());
    }

    #[test]
    fn test_control_chars_replaced() {
        let sb = buffer_with(&["a\x1b[2Jb"]);
        let lines = tail_lines(&sb, 20, 1, &RenderConfig::default());
        assert_eq!(lines, vec!["a\u{fffd}[2Jb"]);
    }

    #[test]
    fn test_timestamps_prefix() {
        let sb = buffer_with(&["hello"]);
        let config = RenderConfig {
            show_timestamps: true,
            ..Default::default()
        };
        let lines = tail_lines(&sb, 40, 1, &config);
        // HH:MM:SS hello
        assert_eq!(lines[0].len(), 8 + 1 + 5);
        assert_eq!(&lines[0][2..3], ":");
        assert!(lines[0].ends_with(" hello"));
    }

    #[test]
    fn test_timestamps_use_local_clock() {
        let sb = buffer_with(&["hello"]);
        let config = RenderConfig {
            show_timestamps: true,
            ..Default::default()
        };
        let entry = sb.last().unwrap();
        let expected = format!(
            "{} hello",
            entry.timestamp.with_timezone(&Local).format("%H:%M:%S")
        );
        assert_eq!(tail_lines(&sb, 40, 1, &config), vec![expected]);
    }

    #[test]
    fn test_render_into_frame_and_lines() {
        let sb = buffer_with(&["first", "second", "third"]);
        let mut buf = RenderBuffer::new(12, 4);
        let written = render_into(&sb, &mut buf, &RenderConfig::default());

        assert_eq!(written, 2);
        assert_eq!(buf.row_text(0), "╭── log ───╮");
        assert_eq!(buf.row_text(1), "│second    │");
        assert_eq!(buf.row_text(2), "│third     │");
        assert_eq!(buf.row_text(3), "╰──────────╯");
    }

    #[test]
    fn test_render_into_tiny_region() {
        let sb = buffer_with(&["hello"]);
        let mut buf = RenderBuffer::new(2, 2);
        assert_eq!(render_into(&sb, &mut buf, &RenderConfig::default()), 0);

        let mut buf = RenderBuffer::new(1, 1);
        assert_eq!(render_into(&sb, &mut buf, &RenderConfig::default()), 0);
    }

    #[test]
    fn test_render_does_not_mutate_scrollback() {
        let sb = buffer_with(&["a", "b"]);
        let before: Vec<_> = sb.iter().map(|e| (e.id, e.text.clone())).collect();
        let mut buf = RenderBuffer::new(10, 5);
        render_into(&sb, &mut buf, &RenderConfig::default());
        let after: Vec<_> = sb.iter().map(|e| (e.id, e.text.clone())).collect();
        assert_eq!(before, after);
    }
}

//! Word wrapping for log lines
//!
//! Widths are counted in codepoints. Lines break at spaces; a single word
//! wider than the line is hard-broken into full-width pieces, and its last
//! piece can share a line with the words that follow. Whitespace inside a
//! line is kept as written; only the spaces at a break are dropped.

use textwrap::{Options, WordSplitter};

/// Wrap `text` to lines of at most `width` characters
///
/// Embedded newlines start a new line. Every paragraph produces at least
/// one line, so an empty string wraps to one empty line. A zero width
/// produces nothing.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let options = Options::new(width)
        .break_words(true)
        .word_splitter(WordSplitter::NoHyphenation);

    text.split('\n')
        .flat_map(|paragraph| textwrap::wrap(paragraph, &options))
        .map(|line| line.into_owned())
        .collect()
}

//! Terminal display utilities for CLI output formatting.
//!
//! Unicode-aware truncation and sizing so tweet text renders sensibly in
//! tables regardless of terminal width.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;
use unicode_width::UnicodeWidthChar;

/// Width used when stdout is not attached to a terminal.
pub const DEFAULT_WIDTH: usize = 100;

static WIDTH: OnceLock<usize> = OnceLock::new();

/// Columns available on stdout, measured once per process.
pub fn terminal_width() -> usize {
    *WIDTH.get_or_init(|| {
        terminal_size()
            .map(|(width, _)| usize::from(width.0))
            .unwrap_or(DEFAULT_WIDTH)
    })
}

/// Whether stdout is a terminal (tables and progress bars) or a pipe (JSON).
pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(1)
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Truncate text to fit within `max_width` columns, appending an ellipsis
/// if anything was cut.
///
/// # Examples
///
/// ```
/// use tweet_analyzer::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }
    format!("{}...", truncated)
}

/// Collapse line breaks and runs of whitespace into single spaces.
///
/// Tweets often contain newlines, which break table rows.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A horizontal bar proportional to `value / max`, at most `width` cells.
///
/// Non-zero values always get at least one cell.
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if value == 0 || max == 0 || width == 0 {
        return String::new();
    }
    let cells = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 0), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // each CJK character is two columns wide
        assert_eq!(truncate_with_ellipsis("日本語のツイート", 9), "日本語...");
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("line one\nline  two\r\n\tend"), "line one line two end");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(10, 10, 20).chars().count(), 20);
        assert_eq!(bar(5, 10, 20).chars().count(), 10);
        assert_eq!(bar(1, 1000, 20).chars().count(), 1);
        assert_eq!(bar(0, 10, 20), "");
        assert_eq!(bar(3, 0, 20), "");
    }
}

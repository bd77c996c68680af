//! Terminal rendering for analysis results.
//!
//! Colored status lines, the category histogram (count table plus bar
//! chart), the raw tweet table, and progress indicators.

use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::{AnalyzedTweet, Histogram, Tweet, TweetField, UNKNOWN_CATEGORY};
use crate::utils::{bar, single_line, terminal_width, truncate_with_ellipsis};

/// Widest bar drawn in the histogram chart
const MAX_BAR_WIDTH: usize = 40;

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// A styled one-line status message.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Search => format!("{} {}", icon.yellow(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print search results header.
pub fn print_search_header(keyword: &str, count: usize, pages: usize, duration: Duration) {
    println!();
    println!(
        "{} Recent tweets for: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        keyword.cyan().bold()
    );
    println!(
        "{} Found {} tweets across {} page(s) in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        pages,
        duration.as_secs_f64()
    );
}

/// Category counts with share of total and a proportional bar.
pub fn histogram_table(histogram: &Histogram) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Category", "Count", "Share", ""]);

    let total = histogram.total();
    let max = histogram.max_count();
    for bucket in histogram.buckets() {
        let share = if total > 0 {
            bucket.count as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        let category = if bucket.category == UNKNOWN_CATEGORY {
            Cell::new(&bucket.category).add_attribute(Attribute::Italic)
        } else {
            Cell::new(&bucket.category).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            category,
            Cell::new(bucket.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
            Cell::new(bar(bucket.count, max, MAX_BAR_WIDTH)),
        ]);
    }
    table
}

fn header_for(fields: &[TweetField], analyzed: bool) -> Vec<String> {
    let mut header = vec!["id".to_string(), "text".to_string()];
    header.extend(fields.iter().map(|f| f.wire_name().to_string()));
    if analyzed {
        header.push("predicted_category".to_string());
        header.push("confidence".to_string());
    }
    header
}

fn text_width(fields: &[TweetField], analyzed: bool) -> usize {
    let fixed = 22 + fields.len() * 18 + if analyzed { 34 } else { 0 };
    terminal_width().saturating_sub(fixed).clamp(20, 80)
}

fn tweet_cells(tweet: &Tweet, fields: &[TweetField], width: usize) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new(&tweet.id),
        Cell::new(truncate_with_ellipsis(&single_line(&tweet.text), width)),
    ];
    cells.extend(fields.iter().map(|f| Cell::new(tweet.field_value(*f))));
    cells
}

fn base_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Raw fetched tweets with the requested field columns.
pub fn tweets_table(tweets: &[Tweet], fields: &[TweetField]) -> Table {
    let width = text_width(fields, false);
    let mut table = base_table(header_for(fields, false));
    for tweet in tweets {
        table.add_row(tweet_cells(tweet, fields, width));
    }
    table
}

/// Classified tweets: requested fields plus category and confidence.
pub fn analyzed_table(tweets: &[AnalyzedTweet], fields: &[TweetField]) -> Table {
    let width = text_width(fields, true);
    let mut table = base_table(header_for(fields, true));
    for analyzed in tweets {
        let mut cells = tweet_cells(&analyzed.tweet, fields, width);
        cells.push(Cell::new(&analyzed.predicted_category));
        cells.push(
            Cell::new(format!("{:.2}", analyzed.confidence)).set_alignment(CellAlignment::Right),
        );
        table.add_row(cells);
    }
    table
}

fn bar_style(template: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
}

/// Spinner shown while pages are being fetched.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message; hidden when `quiet`.
    pub fn new(msg: &str, quiet: bool) -> Self {
        let pb = if quiet {
            indicatif::ProgressBar::hidden()
        } else {
            indicatif::ProgressBar::new_spinner()
        };
        pb.set_style(bar_style("{spinner:.cyan} {msg}").tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.set_style(bar_style("{msg}"));
        self.pb.finish_with_message(status_line(Status::Success, msg));
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(bar_style("{msg}"));
        self.pb.finish_with_message(status_line(Status::Error, msg));
    }
}

/// Progress bar for classifying tweets one by one.
pub struct ClassificationProgress {
    pb: indicatif::ProgressBar,
}

impl ClassificationProgress {
    /// Hidden when `quiet`; the length is set on the first update.
    pub fn new(quiet: bool) -> Self {
        let pb = if quiet {
            indicatif::ProgressBar::hidden()
        } else {
            indicatif::ProgressBar::new(0)
        };
        pb.set_style(
            bar_style("{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%)")
                .progress_chars("█▓▒░ "),
        );
        pb.set_message("Classifying tweets");
        Self { pb }
    }

    /// Record that `done` of `total` tweets are classified.
    pub fn update(&self, done: usize, total: usize) {
        self.pb.set_length(total as u64);
        self.pb.set_position(done as u64);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Classification;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_status_line_contains_message() {
        let line = status_line(Status::Error, "Please enter a keyword");
        assert!(line.contains("Please enter a keyword"));
    }

    #[test]
    fn test_histogram_table_rows() {
        let histogram: Histogram = ["sports", "sports", "unknown"].into_iter().collect();
        let rendered = histogram_table(&histogram).to_string();
        assert!(rendered.contains("sports"));
        assert!(rendered.contains("66.7%"));
        assert!(rendered.contains("33.3%"));
    }

    #[test]
    fn test_analyzed_table_columns() {
        let tweet = Tweet::new("42", "multi\nline tweet").source("Twitter Web App");
        let analyzed = AnalyzedTweet::new(
            tweet,
            Classification {
                category: "tech".to_string(),
                confidence: 0.91,
            },
        );
        let rendered = analyzed_table(&[analyzed], &[TweetField::Source]).to_string();
        assert!(rendered.contains("predicted_category"));
        assert!(rendered.contains("Twitter Web App"));
        assert!(rendered.contains("0.91"));
        assert!(rendered.contains("multi line tweet"));
    }

    #[test]
    fn test_tweets_table_without_fields() {
        let rendered = tweets_table(&[Tweet::new("7", "hello")], &[]).to_string();
        assert!(rendered.contains("hello"));
        assert!(!rendered.contains("predicted_category"));
    }
}

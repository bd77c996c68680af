//! Utility modules shared across the crate.
//!
//! - [`HttpClient`]: HTTP client with sensible timeouts and user agent
//! - [`truncate_with_ellipsis`], [`single_line`], [`bar`]: terminal text helpers
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use tweet_analyzer::utils::HttpClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let _inner: &reqwest::Client = client.client();
//! # Ok(())
//! # }
//! ```

mod display;
mod http;

pub use display::{
    bar, display_width, is_terminal, single_line, terminal_width, truncate_with_ellipsis,
    DEFAULT_WIDTH,
};
pub use http::{HttpClient, DEFAULT_TIMEOUT};

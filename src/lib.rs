//! # Tweet Analyzer
//!
//! Fetches recent tweets matching a keyword, filters them by language and
//! repost status, classifies each one into user-supplied categories with a
//! zero-shot model, and tallies the results into a histogram.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Tweet, SearchQuery, AnalysisReport, etc.)
//! - [`sources`]: Search API clients behind the [`SearchSource`] trait
//! - [`fetch`]: Pagination, filtering and field projection
//! - [`classify`]: Zero-shot classification with a lazy, memoizing handle
//! - [`analysis`]: Precondition checks and the end-to-end [`Analyzer`]
//! - [`ui`]: Terminal rendering of histograms and tweet tables
//! - [`utils`]: HTTP client and text helpers
//! - [`config`]: Configuration management

pub mod analysis;
pub mod classify;
pub mod config;
pub mod fetch;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use analysis::{AnalysisError, AnalysisRequest, Analyzer, PreconditionError};
pub use classify::{ClassifierHandle, ZeroShotClassifier};
pub use fetch::Paginator;
pub use models::{AnalysisReport, SearchQuery, Tweet};
pub use sources::SearchSource;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types for criterion construction and query configuration.

use thiserror::Error;

/// Errors raised while building criteria or validating query options.
///
/// Row evaluation itself never fails: once a query is configured it always
/// produces a [`SearchResult`](crate::SearchResult).
#[derive(Debug, Error)]
pub enum Error {
    /// A `Pattern` criterion whose text is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern text as supplied.
        pattern: String,
        /// The compilation error reported by the regex engine.
        #[source]
        source: regex::Error,
    },

    /// Threshold outside `[0, 1]`, or NaN.
    #[error("threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),

    /// `top_n` outside the accepted range.
    #[error("top_n must be between 1 and {max}, got {value}")]
    InvalidTopN {
        /// The rejected value.
        value: usize,
        /// The largest accepted value.
        max: usize,
    },

    /// No column was selected for scoring.
    #[error("at least one search column is required")]
    NoSearchColumns,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

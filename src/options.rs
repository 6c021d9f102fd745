//! Configuration options for a query.
//!
//! [`SearchOptions`] carries everything besides the rows and criteria: which
//! columns to scan, the acceptance threshold, how many rows to return and
//! the language that picks the phonetic strategy.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options that control one query.
///
/// # Defaults
///
/// - `search_columns`: empty (nothing is scanned until columns are chosen)
/// - `threshold`: `0.5`
/// - `top_n`: `100`
/// - `language`: `"en"`
///
/// # Examples
///
/// ```
/// use rowmatch::SearchOptions;
///
/// let opts = SearchOptions::new([0, 2]).threshold(0.8).top_n(20).language("fr");
/// assert_eq!(opts.search_columns, vec![0, 2]);
/// assert!(opts.validate().is_ok());
///
/// let opts = SearchOptions { threshold: 1.5, ..SearchOptions::new([0]) };
/// assert!(opts.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Column indexes scanned for every criterion.
    pub search_columns: Vec<usize>,
    /// Minimum row score, in `[0, 1]`, for a row to count as found.
    pub threshold: f64,
    /// Maximum number of rows returned.
    pub top_n: usize,
    /// Language code; `"fr"` selects the French phonetic encoder.
    pub language: String,
}

impl SearchOptions {
    /// Largest accepted `top_n`.
    pub const MAX_TOP_N: usize = 100_000;

    /// Default options scanning the given columns.
    pub fn new(columns: impl IntoIterator<Item = usize>) -> Self {
        Self {
            search_columns: columns.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets the threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the maximum number of returned rows.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sets the language code.
    pub fn language(mut self, language: &str) -> Self {
        self.language = language.to_owned();
        self
    }

    /// Checks the bounds a transport should enforce before querying.
    ///
    /// The engine accepts any options; this is for layers that want to
    /// reject bad user input with a typed error.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreshold`] if the threshold is NaN or outside `[0, 1]`
    /// - [`Error::InvalidTopN`] if `top_n` is 0 or above [`Self::MAX_TOP_N`]
    /// - [`Error::NoSearchColumns`] if no column is selected
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidThreshold(self.threshold));
        }
        if self.top_n == 0 || self.top_n > Self::MAX_TOP_N {
            return Err(Error::InvalidTopN {
                value: self.top_n,
                max: Self::MAX_TOP_N,
            });
        }
        if self.search_columns.is_empty() {
            return Err(Error::NoSearchColumns);
        }
        Ok(())
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            search_columns: Vec::new(),
            threshold: 0.5,
            top_n: 100,
            language: "en".to_owned(),
        }
    }
}

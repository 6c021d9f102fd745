#![warn(missing_docs)]

//! A multi-criterion fuzzy record matcher for data cleaning and deduplication.
//!
//! `rowmatch` ranks every row of a dataset against a set of criteria, blending
//! Jaro-Winkler spelling similarity with phonetic similarity, vetoing rows
//! that miss an exact or pattern criterion, and reporting how the result set
//! reacts to the chosen threshold.

/// Phonetic code memoisation scoped to one language.
pub mod cache;

/// Matching criteria and their serializable specification form.
pub mod criterion;

/// Query orchestration, row evaluation and result statistics.
pub mod engine;

/// Error types for configuration failures.
pub mod error;

/// Configuration options for a query.
pub mod options;

/// Phonetic encoders: a French rule-based transform and a generic fallback.
pub mod phonetic;

/// Per-row, per-criterion scoring.
pub mod scoring;

/// Ordering of scored rows.
pub mod sort;

// Re-export primary public API types and functions at the crate root.
pub use cache::PhoneticCache;
pub use criterion::{Criterion, CriterionSpec, MatchMode};
pub use engine::{Candidate, MatchEngine, RowResult, SearchResult};
pub use error::{Error, Result};
pub use options::SearchOptions;
pub use phonetic::{FrenchPhonetic, GenericPhonetic, PhoneticEncoder, PhoneticStrategy};
pub use scoring::{CriterionMatch, score_row, spelling_similarity};
pub use sort::compare_rows;

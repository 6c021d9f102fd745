//! Query orchestration.
//!
//! [`MatchEngine::search`] runs the whole pipeline:
//!
//! 1. bind the phonetic cache to the query language (clearing it on change);
//! 2. prepare every active criterion once, including its phonetic code;
//! 3. evaluate all rows in parallel, vetoing rows that miss an `Exact` or
//!    `Pattern` criterion;
//! 4. score each surviving row as the product of its criterion scores;
//! 5. gather threshold statistics over every scored row, then sort and
//!    truncate the rows meeting the threshold.
//!
//! Rows that score exactly 0 share nothing with the query and are treated
//! like vetoed rows: they count neither as found nor in the statistics.

use rayon::prelude::*;

use crate::cache::PhoneticCache;
use crate::criterion::Criterion;
use crate::options::SearchOptions;
use crate::scoring::{CriterionMatch, PreparedCriterion, score_prepared};
use crate::sort::sort_rows;

/// One candidate row and the source line it came from.
///
/// The engine never interprets `line`; it is carried through so callers can
/// point back at the original record, and it breaks ranking ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Source position, 1-based by convention.
    pub line: u64,
    /// Field values in column order.
    pub fields: Vec<String>,
}

impl Candidate {
    /// Creates a candidate from its line number and fields.
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Numbers rows from 1 in iteration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowmatch::Candidate;
    ///
    /// let rows = Candidate::numbered(vec![vec!["A".to_owned()], vec!["B".to_owned()]]);
    /// assert_eq!(rows[1].line, 2);
    /// assert_eq!(rows[1].fields, vec!["B"]);
    /// ```
    pub fn numbered<I>(rows: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        rows.into_iter()
            .zip(1u64..)
            .map(|(fields, line)| Candidate::new(line, fields))
            .collect()
    }
}

/// A scored row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult<'a> {
    /// The row this result refers to.
    pub candidate: &'a Candidate,
    /// Best match per active criterion, in criterion order.
    pub matches: Vec<CriterionMatch>,
    /// Product of the criterion scores.
    pub score: f64,
}

impl RowResult<'_> {
    /// The criterion match with the highest score (the earliest one on ties).
    pub fn best_match(&self) -> Option<&CriterionMatch> {
        self.matches
            .iter()
            .reduce(|best, m| if m.score > best.score { m } else { best })
    }
}

/// The outcome of a query.
///
/// `results` holds at most `top_n` rows; every other statistic covers the
/// whole candidate set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult<'a> {
    /// Ranked rows meeting the threshold, truncated to `top_n`.
    pub results: Vec<RowResult<'a>>,
    /// Ranked rows meeting the threshold beyond the `top_n` cut.
    pub overflow: Vec<RowResult<'a>>,
    /// Number of rows meeting the threshold.
    pub total_found: usize,
    /// Number of candidate rows in the query.
    pub total_results: usize,
    /// Highest score strictly below the threshold (0 if none).
    pub max_under_threshold: f64,
    /// Lowest score at or above the threshold (0 if none).
    pub min_above_threshold: f64,
    /// Highest score at or above the threshold (0 if none).
    pub max_above_threshold: f64,
}

impl<'a> SearchResult<'a> {
    /// Every row meeting the threshold, in ranking order, ignoring `top_n`.
    pub fn all_found(&self) -> impl Iterator<Item = &RowResult<'a>> {
        self.results.iter().chain(&self.overflow)
    }
}

/// Threshold statistics accumulated over every scored row.
#[derive(Debug, Clone, Copy, Default)]
struct ThresholdStats {
    max_under: f64,
    min_above: Option<f64>,
    max_above: f64,
}

impl ThresholdStats {
    fn record(&mut self, score: f64, threshold: f64) {
        if score < threshold {
            self.max_under = self.max_under.max(score);
        } else {
            self.min_above = Some(self.min_above.map_or(score, |m| m.min(score)));
            self.max_above = self.max_above.max(score);
        }
    }
}

/// The matching engine. Owns the phonetic cache shared by its queries.
///
/// # Examples
///
/// ```
/// use rowmatch::{Candidate, Criterion, MatchEngine, SearchOptions};
///
/// let rows = Candidate::numbered(vec![
///     vec!["SMITH".to_owned()],
///     vec!["SMYTH".to_owned()],
///     vec!["JONES".to_owned()],
/// ]);
/// let criteria = [Criterion::similarity("smith").weights(1.0, 0.0)];
/// let options = SearchOptions::new([0]).threshold(0.9).top_n(10);
///
/// let mut engine = MatchEngine::new();
/// let result = engine.search(&rows, &criteria, &options);
/// assert_eq!(result.results[0].candidate.fields[0], "SMITH");
/// assert_eq!(result.results[0].score, 1.0);
/// assert_eq!(result.total_results, 3);
/// ```
#[derive(Debug, Default)]
pub struct MatchEngine {
    cache: PhoneticCache,
}

impl MatchEngine {
    /// Creates an engine with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine around an existing cache.
    pub fn with_cache(cache: PhoneticCache) -> Self {
        Self { cache }
    }

    /// The phonetic cache, as left by the last query.
    pub fn cache(&self) -> &PhoneticCache {
        &self.cache
    }

    /// Ranks `candidates` against `criteria`.
    ///
    /// Inactive criteria are ignored; with no active criterion the result is
    /// empty with all counts at 0. Never fails: malformed rows simply score
    /// nothing in the columns they lack.
    pub fn search<'a>(
        &mut self,
        candidates: &'a [Candidate],
        criteria: &[Criterion],
        options: &SearchOptions,
    ) -> SearchResult<'a> {
        self.cache.reset_for(&options.language);
        let cache = &self.cache;

        let prepared: Vec<PreparedCriterion<'_>> = criteria
            .iter()
            .filter_map(|c| PreparedCriterion::new(c, cache))
            .collect();
        if prepared.is_empty() {
            tracing::debug!("no active criteria, nothing to search for");
            return SearchResult::default();
        }

        let columns = options.search_columns.as_slice();
        let threshold = options.threshold;

        let scored: Vec<RowResult<'a>> = candidates
            .par_iter()
            .filter_map(|candidate| evaluate(candidate, &prepared, columns, cache))
            .filter(|row| row.score > 0.0)
            .collect();

        let mut stats = ThresholdStats::default();
        for row in &scored {
            stats.record(row.score, threshold);
        }

        let mut found: Vec<RowResult<'a>> = scored
            .into_iter()
            .filter(|row| row.score >= threshold)
            .collect();
        sort_rows(&mut found);

        let total_found = found.len();
        let overflow = found.split_off(total_found.min(options.top_n));

        tracing::debug!(
            language = %cache.language(),
            criteria = prepared.len(),
            candidates = candidates.len(),
            found = total_found,
            returned = found.len(),
            cached_codes = cache.len(),
            "search complete"
        );

        SearchResult {
            results: found,
            overflow,
            total_found,
            total_results: candidates.len(),
            max_under_threshold: stats.max_under,
            min_above_threshold: stats.min_above.unwrap_or(0.0),
            max_above_threshold: stats.max_above,
        }
    }
}

/// Scores one row against every prepared criterion.
///
/// Returns `None` when a strict (`Exact` or `Pattern`) criterion finds no
/// matching column. The veto is decided on the match itself, independent
/// of the score, so it holds even when weights would zero the product.
fn evaluate<'a>(
    candidate: &'a Candidate,
    prepared: &[PreparedCriterion<'_>],
    columns: &[usize],
    cache: &PhoneticCache,
) -> Option<RowResult<'a>> {
    let mut matches = Vec::with_capacity(prepared.len());
    let mut score = 1.0;
    for criterion in prepared {
        let best = score_prepared(&candidate.fields, criterion, columns, cache);
        if criterion.criterion.mode().is_strict() && !best.is_matched() {
            tracing::trace!(line = candidate.line, "row vetoed by strict criterion");
            return None;
        }
        score *= best.score;
        matches.push(best);
    }
    Some(RowResult {
        candidate,
        matches,
        score,
    })
}

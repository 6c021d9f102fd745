//! Row scoring for a single criterion.
//!
//! [`score_row`] scans the searchable columns of one row and keeps the best
//! column for one criterion. Matching-mode rules:
//!
//! | Mode         | Combined score                                   | Phonetic score |
//! |--------------|--------------------------------------------------|----------------|
//! | `Exact`      | 1.0 on case-insensitive equality, else no match  | 1.0            |
//! | `Pattern`    | 1.0 when the pattern is found, else no match     | 1.0            |
//! | `Similarity` | weighted average of spelling and phonetic scores | computed       |
//!
//! A column only replaces the running best when its combined score is
//! strictly greater, so the first column reaching a maximum wins. In
//! `Similarity` mode it must also clear both minimum scores.

use crate::cache::PhoneticCache;
use crate::criterion::{Criterion, MatchMode};

/// Jaro-Winkler spelling similarity in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use rowmatch::spelling_similarity;
///
/// assert_eq!(spelling_similarity("SMITH", "SMITH"), 1.0);
/// assert!(spelling_similarity("SMYTH", "SMITH") > 0.85);
/// assert_eq!(spelling_similarity("JONES", "SMITH"), 0.0);
/// ```
pub fn spelling_similarity(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(a, b)
}

/// The best column found on one row for one criterion.
///
/// A fresh match has no column and a score of 0. It is only updated while
/// the row it belongs to is being scanned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriterionMatch {
    /// The normalized (trimmed, upper-cased) cell value that matched.
    pub value: Option<String>,
    /// Jaro-Winkler score of `value` against the criterion text.
    pub spelling_score: f64,
    /// Phonetic score of `value` (1.0 for `Exact` and `Pattern`).
    pub phonetic_score: f64,
    /// Weighted combination used for ranking.
    pub score: f64,
    /// Index of the column `value` came from.
    pub column: Option<usize>,
}

impl CriterionMatch {
    /// Returns `true` once a column has been accepted.
    pub fn is_matched(&self) -> bool {
        self.column.is_some()
    }

    fn offer(&mut self, column: usize, value: String, spelling: f64, phonetic: f64, score: f64) {
        self.value = Some(value);
        self.spelling_score = spelling;
        self.phonetic_score = phonetic;
        self.score = score;
        self.column = Some(column);
    }
}

/// A criterion with its phonetic code computed once for the whole query.
#[derive(Debug)]
pub(crate) struct PreparedCriterion<'c> {
    pub(crate) criterion: &'c Criterion,
    text: &'c str,
    phonetic: String,
}

impl<'c> PreparedCriterion<'c> {
    /// Prepares an active criterion; inactive ones yield `None`.
    pub(crate) fn new(criterion: &'c Criterion, cache: &PhoneticCache) -> Option<Self> {
        let text = criterion.text()?;
        let phonetic = match criterion.mode() {
            MatchMode::Similarity => cache.encode_uncached(text),
            MatchMode::Exact | MatchMode::Pattern => String::new(),
        };
        Some(Self {
            criterion,
            text,
            phonetic,
        })
    }
}

/// Normalizes a cell for comparison: trimmed and upper-cased. Missing and
/// blank cells yield `None`.
fn normalized_cell(fields: &[String], column: usize) -> Option<String> {
    let cell = fields.get(column)?.trim();
    (!cell.is_empty()).then(|| cell.to_uppercase())
}

/// Scores one row against one criterion over the given columns.
///
/// Columns beyond the end of the row, and blank cells, are skipped. An
/// inactive criterion returns an unmatched [`CriterionMatch`].
///
/// # Examples
///
/// ```
/// use rowmatch::{Criterion, PhoneticCache, score_row};
///
/// let cache = PhoneticCache::new("en");
/// let row = vec!["10".to_owned(), "smith".to_owned(), "John".to_owned()];
/// let best = score_row(&row, &Criterion::exact("SMITH"), &[0, 1, 2, 7], &cache);
/// assert_eq!(best.column, Some(1));
/// assert_eq!(best.score, 1.0);
/// ```
pub fn score_row(
    fields: &[String],
    criterion: &Criterion,
    columns: &[usize],
    cache: &PhoneticCache,
) -> CriterionMatch {
    match PreparedCriterion::new(criterion, cache) {
        Some(prepared) => score_prepared(fields, &prepared, columns, cache),
        None => CriterionMatch::default(),
    }
}

pub(crate) fn score_prepared(
    fields: &[String],
    prepared: &PreparedCriterion<'_>,
    columns: &[usize],
    cache: &PhoneticCache,
) -> CriterionMatch {
    let criterion = prepared.criterion;
    let mut best = CriterionMatch::default();

    for &column in columns {
        let Some(cell) = normalized_cell(fields, column) else {
            continue;
        };

        match criterion.mode() {
            MatchMode::Exact | MatchMode::Pattern => {
                if criterion.is_strict_match(&cell) && 1.0 > best.score {
                    best.offer(column, cell, 1.0, 1.0, 1.0);
                }
            }
            MatchMode::Similarity => {
                let spelling = spelling_similarity(&cell, prepared.text);
                let code = cache.code(&cell);
                let phonetic = if code == prepared.phonetic {
                    1.0
                } else {
                    spelling_similarity(&code, &prepared.phonetic)
                };
                let score = criterion.combine(spelling, phonetic);
                if score > best.score
                    && spelling >= criterion.min_spelling_score()
                    && phonetic >= criterion.min_phonetic_score()
                {
                    best.offer(column, cell, spelling, phonetic, score);
                }
            }
        }
    }

    best
}

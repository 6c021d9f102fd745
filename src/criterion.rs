//! Matching criteria.
//!
//! A [`Criterion`] describes one condition a row must satisfy: a target text,
//! a [`MatchMode`], and the weights and floors used when blending spelling
//! and phonetic similarity. Criteria are built once per query and are
//! read-only while rows are evaluated.
//!
//! [`CriterionSpec`] is the raw, serializable form a settings or transport
//! layer stores; it becomes a [`Criterion`] through [`TryFrom`].

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a criterion compares its text against a cell.
///
/// # Examples
///
/// ```
/// use rowmatch::MatchMode;
///
/// assert_eq!(MatchMode::default(), MatchMode::Similarity);
/// assert!(MatchMode::Exact.is_strict());
/// assert!(!MatchMode::Similarity.is_strict());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive equality with the whole cell.
    Exact,
    /// Case-insensitive regular expression searched anywhere in the cell.
    Pattern,
    /// Weighted blend of Jaro-Winkler spelling and phonetic similarity.
    #[default]
    Similarity,
}

impl MatchMode {
    /// Returns `true` for modes where a missing match vetoes the whole row.
    pub fn is_strict(self) -> bool {
        matches!(self, MatchMode::Exact | MatchMode::Pattern)
    }
}

/// One matching condition of a query.
///
/// The target text is trimmed and upper-cased at construction. Blank text
/// makes the criterion inactive: it is skipped during scoring and never
/// affects a row's score.
///
/// # Examples
///
/// ```
/// use rowmatch::{Criterion, MatchMode};
///
/// let c = Criterion::similarity("  Dupont ").weights(2.0, 1.0).min_scores(0.7, 0.0);
/// assert_eq!(c.text(), Some("DUPONT"));
/// assert_eq!(c.mode(), MatchMode::Similarity);
/// assert!(c.is_active());
///
/// assert!(!Criterion::exact("   ").is_active());
/// assert!(Criterion::pattern("([a-z").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Criterion {
    text: Option<String>,
    mode: MatchMode,
    spelling_weight: f64,
    phonetic_weight: f64,
    min_spelling_score: f64,
    min_phonetic_score: f64,
    pattern: Option<Regex>,
}

impl Criterion {
    fn with_mode(text: &str, mode: MatchMode) -> Self {
        let trimmed = text.trim();
        Self {
            text: (!trimmed.is_empty()).then(|| trimmed.to_uppercase()),
            mode,
            spelling_weight: 1.0,
            phonetic_weight: 1.0,
            min_spelling_score: 0.0,
            min_phonetic_score: 0.0,
            pattern: None,
        }
    }

    /// Creates a `Similarity` criterion with equal weights and no floors.
    pub fn similarity(text: &str) -> Self {
        Self::with_mode(text, MatchMode::Similarity)
    }

    /// Creates an `Exact` criterion.
    pub fn exact(text: &str) -> Self {
        Self::with_mode(text, MatchMode::Exact)
    }

    /// Creates a `Pattern` criterion, compiling the expression immediately.
    ///
    /// The expression is compiled from the trimmed input rather than the
    /// upper-cased copy, so escapes like `\d` or `\w` keep their meaning.
    /// Matching is case-insensitive and `.` also matches newlines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] when the expression does not compile.
    pub fn pattern(text: &str) -> Result<Self> {
        let mut criterion = Self::with_mode(text, MatchMode::Pattern);
        if criterion.text.is_some() {
            let source = text.trim();
            let regex = RegexBuilder::new(source)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .map_err(|source_err| Error::InvalidPattern {
                    pattern: source.to_owned(),
                    source: source_err,
                })?;
            criterion.pattern = Some(regex);
        }
        Ok(criterion)
    }

    /// Builds a criterion of the given mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for a `Pattern` criterion whose text
    /// does not compile.
    pub fn new(text: &str, mode: MatchMode) -> Result<Self> {
        match mode {
            MatchMode::Exact => Ok(Self::exact(text)),
            MatchMode::Pattern => Self::pattern(text),
            MatchMode::Similarity => Ok(Self::similarity(text)),
        }
    }

    /// Sets the spelling and phonetic weights. Negative values are clamped to 0.
    pub fn weights(mut self, spelling: f64, phonetic: f64) -> Self {
        self.spelling_weight = spelling.max(0.0);
        self.phonetic_weight = phonetic.max(0.0);
        self
    }

    /// Sets the acceptance floors used in `Similarity` mode.
    pub fn min_scores(mut self, spelling: f64, phonetic: f64) -> Self {
        self.min_spelling_score = spelling;
        self.min_phonetic_score = phonetic;
        self
    }

    /// The trimmed, upper-cased target text, or `None` when inactive.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns whether this criterion takes part in scoring.
    pub fn is_active(&self) -> bool {
        self.text.is_some()
    }

    /// The matching mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Weight of the spelling score in the combined score.
    pub fn spelling_weight(&self) -> f64 {
        self.spelling_weight
    }

    /// Weight of the phonetic score in the combined score.
    pub fn phonetic_weight(&self) -> f64 {
        self.phonetic_weight
    }

    /// Minimum spelling score a cell needs in `Similarity` mode.
    pub fn min_spelling_score(&self) -> f64 {
        self.min_spelling_score
    }

    /// Minimum phonetic score a cell needs in `Similarity` mode.
    pub fn min_phonetic_score(&self) -> f64 {
        self.min_phonetic_score
    }

    /// Weighted average of the two scores, or 0 when both weights are 0.
    pub fn combine(&self, spelling: f64, phonetic: f64) -> f64 {
        let total = self.spelling_weight + self.phonetic_weight;
        if total == 0.0 {
            return 0.0;
        }
        (spelling * self.spelling_weight + phonetic * self.phonetic_weight) / total
    }

    /// Returns whether `cell` satisfies an `Exact` or `Pattern` criterion.
    ///
    /// Always `false` for inactive and `Similarity` criteria.
    pub(crate) fn is_strict_match(&self, cell: &str) -> bool {
        match (self.mode, self.text.as_deref()) {
            (MatchMode::Exact, Some(text)) => eq_ignore_case(cell, text),
            (MatchMode::Pattern, Some(_)) => self
                .pattern
                .as_ref()
                .is_some_and(|regex| regex.is_match(cell)),
            _ => false,
        }
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_uppercase)
        .eq(b.chars().flat_map(char::to_uppercase))
}

/// Serializable description of a criterion, as entered by a user.
///
/// Missing fields take the same defaults a fresh form would show: equal
/// weights, no floors, `Similarity` mode.
///
/// # Examples
///
/// ```
/// use rowmatch::{Criterion, CriterionSpec, MatchMode};
///
/// let spec = CriterionSpec {
///     value: "^DU".into(),
///     mode: MatchMode::Pattern,
///     ..Default::default()
/// };
/// let criterion = Criterion::try_from(&spec).unwrap();
/// assert_eq!(criterion.mode(), MatchMode::Pattern);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionSpec {
    /// Target text as typed.
    pub value: String,
    /// Weight of the spelling score.
    pub spelling_weight: f64,
    /// Weight of the phonetic score.
    pub phonetic_weight: f64,
    /// Spelling floor for `Similarity` mode.
    pub min_spelling_score: f64,
    /// Phonetic floor for `Similarity` mode.
    pub min_phonetic_score: f64,
    /// Matching mode.
    pub mode: MatchMode,
}

impl Default for CriterionSpec {
    fn default() -> Self {
        Self {
            value: String::new(),
            spelling_weight: 1.0,
            phonetic_weight: 1.0,
            min_spelling_score: 0.0,
            min_phonetic_score: 0.0,
            mode: MatchMode::Similarity,
        }
    }
}

impl TryFrom<&CriterionSpec> for Criterion {
    type Error = Error;

    fn try_from(spec: &CriterionSpec) -> Result<Self> {
        Ok(Criterion::new(&spec.value, spec.mode)?
            .weights(spec.spelling_weight, spec.phonetic_weight)
            .min_scores(spec.min_spelling_score, spec.min_phonetic_score))
    }
}

impl TryFrom<CriterionSpec> for Criterion {
    type Error = Error;

    fn try_from(spec: CriterionSpec) -> Result<Self> {
        Criterion::try_from(&spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_uppercased() {
        let c = Criterion::similarity("  martin ");
        assert_eq!(c.text(), Some("MARTIN"));
    }

    #[test]
    fn blank_text_is_inactive() {
        assert!(!Criterion::similarity("").is_active());
        assert!(!Criterion::similarity(" \t ").is_active());
        assert!(Criterion::similarity("x").is_active());
    }

    #[test]
    fn blank_pattern_does_not_compile_anything() {
        let c = Criterion::pattern("   ").unwrap();
        assert!(!c.is_active());
        assert!(!c.is_strict_match("ANY"));
    }

    #[test]
    fn invalid_pattern_is_construction_error() {
        let err = Criterion::pattern("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn pattern_is_case_insensitive() {
        let c = Criterion::pattern("^sm").unwrap();
        assert!(c.is_strict_match("SMITH"));
        assert!(!c.is_strict_match("JONES"));
    }

    #[test]
    fn pattern_dot_matches_newline() {
        let c = Criterion::pattern("A.B").unwrap();
        assert!(c.is_strict_match("A\nB"));
    }

    #[test]
    fn pattern_keeps_lowercase_escapes() {
        // Upper-casing `\d` would turn it into `\D`.
        let c = Criterion::pattern(r"^\d{5}$").unwrap();
        assert!(c.is_strict_match("75011"));
        assert!(!c.is_strict_match("PARIS"));
    }

    #[test]
    fn exact_is_case_insensitive() {
        let c = Criterion::exact("smith");
        assert!(c.is_strict_match("SMITH"));
        assert!(c.is_strict_match("Smith"));
        assert!(!c.is_strict_match("SMYTH"));
    }

    #[test]
    fn exact_handles_non_ascii() {
        let c = Criterion::exact("hélène");
        assert!(c.is_strict_match("HÉLÈNE"));
    }

    #[test]
    fn similarity_never_strict_matches() {
        let c = Criterion::similarity("SMITH");
        assert!(!c.is_strict_match("SMITH"));
    }

    #[test]
    fn combine_is_weighted_average() {
        let c = Criterion::similarity("x").weights(3.0, 1.0);
        let combined = c.combine(1.0, 0.0);
        assert!((combined - 0.75).abs() < 1e-12);
    }

    #[test]
    fn combine_with_zero_weights_is_zero() {
        let c = Criterion::similarity("x").weights(0.0, 0.0);
        assert_eq!(c.combine(1.0, 1.0), 0.0);
    }

    #[test]
    fn negative_weights_are_clamped() {
        let c = Criterion::similarity("x").weights(-1.0, 2.0);
        assert_eq!(c.spelling_weight(), 0.0);
        assert_eq!(c.phonetic_weight(), 2.0);
    }

    #[test]
    fn defaults_match_a_fresh_form() {
        let c = Criterion::similarity("x");
        assert_eq!(c.spelling_weight(), 1.0);
        assert_eq!(c.phonetic_weight(), 1.0);
        assert_eq!(c.min_spelling_score(), 0.0);
        assert_eq!(c.min_phonetic_score(), 0.0);
    }

    #[test]
    fn new_dispatches_on_mode() {
        assert_eq!(Criterion::new("a", MatchMode::Exact).unwrap().mode(), MatchMode::Exact);
        assert_eq!(Criterion::new("a", MatchMode::Pattern).unwrap().mode(), MatchMode::Pattern);
        assert!(Criterion::new("[", MatchMode::Pattern).is_err());
        assert!(Criterion::new("[", MatchMode::Similarity).is_ok());
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let spec: CriterionSpec = serde_json::from_str(r#"{"value":"Durand"}"#).unwrap();
        assert_eq!(spec.mode, MatchMode::Similarity);
        assert_eq!(spec.spelling_weight, 1.0);
        let c = Criterion::try_from(spec).unwrap();
        assert_eq!(c.text(), Some("DURAND"));
    }

    #[test]
    fn spec_mode_uses_snake_case() {
        let json = r#"{"value":"x","mode":"pattern","spelling_weight":2.0}"#;
        let spec: CriterionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.mode, MatchMode::Pattern);
        assert_eq!(spec.spelling_weight, 2.0);
    }

    #[test]
    fn spec_with_invalid_pattern_fails() {
        let spec = CriterionSpec {
            value: "a(".into(),
            mode: MatchMode::Pattern,
            ..Default::default()
        };
        assert!(Criterion::try_from(&spec).is_err());
    }

    #[test]
    fn strictness_by_mode() {
        assert!(MatchMode::Exact.is_strict());
        assert!(MatchMode::Pattern.is_strict());
        assert!(!MatchMode::Similarity.is_strict());
    }
}

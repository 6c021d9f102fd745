//! Ordering of scored rows.
//!
//! Rows are ranked by score, highest first. Equal scores fall back to the
//! source line, so a ranking never depends on the order rows were evaluated in.

use std::cmp::Ordering;

use crate::engine::RowResult;

/// Two-level comparator for ranking rows.
///
/// 1. **Higher score wins**.
/// 2. **Lower source line wins** when scores are equal.
///
/// A NaN score compares as equal to anything, leaving the tie to the
/// source line.
///
/// # Examples
///
/// ```
/// use rowmatch::{Candidate, RowResult, compare_rows};
/// use std::cmp::Ordering;
///
/// let a = Candidate::new(1, vec!["A".into()]);
/// let b = Candidate::new(2, vec!["B".into()]);
/// let high = RowResult { candidate: &a, matches: vec![], score: 0.9 };
/// let low = RowResult { candidate: &b, matches: vec![], score: 0.4 };
///
/// assert_eq!(compare_rows(&high, &low), Ordering::Less);
/// ```
pub fn compare_rows(a: &RowResult<'_>, b: &RowResult<'_>) -> Ordering {
    // Level 1: descending score.
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        // Level 2: ascending source line.
        .then_with(|| a.candidate.line.cmp(&b.candidate.line))
}

/// Sorts rows in ranking order. The sort is stable.
pub(crate) fn sort_rows(rows: &mut [RowResult<'_>]) {
    rows.sort_by(compare_rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Candidate;

    fn candidates() -> Vec<Candidate> {
        (1..=4).map(|line| Candidate::new(line, vec![format!("ROW{line}")])).collect()
    }

    fn ranked(candidate: &Candidate, score: f64) -> RowResult<'_> {
        RowResult {
            candidate,
            matches: Vec::new(),
            score,
        }
    }

    #[test]
    fn higher_score_sorts_first() {
        let c = candidates();
        assert_eq!(compare_rows(&ranked(&c[0], 0.8), &ranked(&c[1], 0.5)), Ordering::Less);
        assert_eq!(compare_rows(&ranked(&c[0], 0.5), &ranked(&c[1], 0.8)), Ordering::Greater);
    }

    #[test]
    fn equal_scores_fall_back_to_line() {
        let c = candidates();
        assert_eq!(compare_rows(&ranked(&c[2], 0.7), &ranked(&c[0], 0.7)), Ordering::Greater);
        assert_eq!(compare_rows(&ranked(&c[0], 0.7), &ranked(&c[0], 0.7)), Ordering::Equal);
    }

    #[test]
    fn line_ignored_when_scores_differ() {
        let c = candidates();
        assert_eq!(compare_rows(&ranked(&c[3], 0.9), &ranked(&c[0], 0.1)), Ordering::Less);
    }

    #[test]
    fn nan_defers_to_line() {
        let c = candidates();
        assert_eq!(compare_rows(&ranked(&c[0], f64::NAN), &ranked(&c[1], 0.5)), Ordering::Less);
    }

    #[test]
    fn sort_rows_orders_all_levels() {
        let c = candidates();
        let mut rows = vec![
            ranked(&c[3], 0.5),
            ranked(&c[0], 0.5),
            ranked(&c[1], 0.9),
            ranked(&c[2], 0.1),
        ];
        sort_rows(&mut rows);
        let lines: Vec<u64> = rows.iter().map(|r| r.candidate.line).collect();
        assert_eq!(lines, vec![2, 1, 4, 3]);
    }
}

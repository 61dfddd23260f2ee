//! Score resolution for representative selection.
//!
//! Every label entering the reducer needs a score, higher meaning "better
//! candidate to stand for its cluster". Three sources, in the order callers
//! usually reach for them:
//!
//! | Source | Score | Needs |
//! |--------|-------|-------|
//! | [`ScoreSource::Provided`] | caller-supplied map | full coverage |
//! | [`ScoreSource::Uniqueness`] | `1 - mean(sim to others)` | nothing |
//! | [`ScoreSource::TermSize`] | annotated-set size | annotation port |
//!
//! Resolved scores are not normalized; they are only compared within one
//! resolution.

use core::fmt;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::matrix::SimilarityMatrix;
use crate::ports::Annotations;

/// Where per-label scores come from.
pub enum ScoreSource<'a> {
    /// Caller-provided scores. Must cover every matrix label; resolution
    /// fails with [`Error::MissingScores`] naming the uncovered labels
    /// otherwise.
    Provided(&'a BTreeMap<String, f64>),
    /// Uniqueness fallback: `1 - mean similarity to all other labels`.
    /// A singleton label set scores 1.0.
    Uniqueness,
    /// Annotated-set size via the annotation port. A failed lookup is
    /// [`Error::Lookup`], propagated.
    TermSize(&'a dyn Annotations),
}

impl Default for ScoreSource<'_> {
    fn default() -> Self {
        ScoreSource::Uniqueness
    }
}

impl fmt::Debug for ScoreSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSource::Provided(scores) => {
                f.debug_tuple("Provided").field(&scores.len()).finish()
            }
            ScoreSource::Uniqueness => f.write_str("Uniqueness"),
            ScoreSource::TermSize(_) => f.write_str("TermSize"),
        }
    }
}

/// Resolve one score per matrix label, aligned with `matrix.labels()`.
pub fn resolve_scores(matrix: &SimilarityMatrix, source: &ScoreSource<'_>) -> Result<Vec<f64>> {
    match source {
        ScoreSource::Provided(scores) => {
            let missing: Vec<String> = matrix
                .labels()
                .iter()
                .filter(|l| !scores.contains_key(*l))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Error::MissingScores { labels: missing });
            }
            let mut out = Vec::with_capacity(matrix.len());
            for label in matrix.labels() {
                let value = scores[label];
                if !value.is_finite() {
                    return Err(Error::InvalidScore {
                        label: label.clone(),
                        value,
                    });
                }
                out.push(value);
            }
            Ok(out)
        }
        ScoreSource::Uniqueness => Ok(uniqueness_scores(matrix)),
        ScoreSource::TermSize(annotations) => matrix
            .labels()
            .iter()
            .map(|l| annotations.term_size(l).map(|s| s as f64))
            .collect(),
    }
}

/// Uniqueness score per label: `1 - mean similarity to every other label`.
///
/// The most generic importance signal available without any external
/// collaborator: a term similar to everything is redundant (low score), a
/// term similar to nothing carries information of its own (high score).
/// Labels with identical similarity to everything tie; downstream selection
/// breaks ties lexically.
pub fn uniqueness_scores(matrix: &SimilarityMatrix) -> Vec<f64> {
    let n = matrix.len();
    if n == 1 {
        return vec![1.0];
    }
    (0..n).map(|i| 1.0 - matrix.mean_offdiagonal(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MapAnnotations;
    use ndarray::Array2;

    fn three_term_matrix() -> SimilarityMatrix {
        let values = Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 0.9, 0.2, //
                0.9, 1.0, 0.3, //
                0.2, 0.3, 1.0,
            ],
        )
        .unwrap();
        SimilarityMatrix::from_values(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_uniqueness() {
        let m = three_term_matrix();
        let u = uniqueness_scores(&m);

        assert!((u[0] - 0.45).abs() < 1e-12); // A: 1 - (0.9 + 0.2) / 2
        assert!((u[1] - 0.40).abs() < 1e-12); // B: 1 - (0.9 + 0.3) / 2
        assert!((u[2] - 0.75).abs() < 1e-12); // C: 1 - (0.2 + 0.3) / 2
    }

    #[test]
    fn test_uniqueness_singleton_is_one() {
        let m = SimilarityMatrix::from_values(
            vec!["A".to_string()],
            Array2::from_elem((1, 1), 1.0),
        )
        .unwrap();
        assert_eq!(uniqueness_scores(&m), vec![1.0]);
    }

    #[test]
    fn test_provided_full_coverage() {
        let m = three_term_matrix();
        let scores: BTreeMap<String, f64> = [("A", 5.0), ("B", 3.0), ("C", 10.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let resolved = resolve_scores(&m, &ScoreSource::Provided(&scores)).unwrap();
        assert_eq!(resolved, vec![5.0, 3.0, 10.0]);
    }

    #[test]
    fn test_provided_missing_names_labels() {
        let m = three_term_matrix();
        let scores: BTreeMap<String, f64> =
            [("A".to_string(), 5.0)].into_iter().collect();

        let err = resolve_scores(&m, &ScoreSource::Provided(&scores)).unwrap_err();
        assert_eq!(
            err,
            Error::MissingScores {
                labels: vec!["B".to_string(), "C".to_string()]
            }
        );
    }

    #[test]
    fn test_provided_non_finite_rejected() {
        let m = three_term_matrix();
        let scores: BTreeMap<String, f64> = [
            ("A".to_string(), 5.0),
            ("B".to_string(), f64::NAN),
            ("C".to_string(), 10.0),
        ]
        .into_iter()
        .collect();

        let err = resolve_scores(&m, &ScoreSource::Provided(&scores)).unwrap_err();
        assert!(matches!(err, Error::InvalidScore { .. }), "{err}");
    }

    #[test]
    fn test_term_size_scoring() {
        let m = three_term_matrix();
        let ann = MapAnnotations::new()
            .with_term("A", "term a", 120)
            .with_term("B", "term b", 40)
            .with_term("C", "term c", 900);

        let resolved = resolve_scores(&m, &ScoreSource::TermSize(&ann)).unwrap();
        assert_eq!(resolved, vec![120.0, 40.0, 900.0]);
    }

    #[test]
    fn test_term_size_lookup_failure_propagates() {
        let m = three_term_matrix();
        let ann = MapAnnotations::new().with_term("A", "term a", 120);

        let err = resolve_scores(&m, &ScoreSource::TermSize(&ann)).unwrap_err();
        assert!(matches!(err, Error::Lookup { .. }), "{err}");
    }
}

//! Symmetric pairwise similarity matrices over labeled terms.
//!
//! A [`SimilarityMatrix`] is the input shape every reduction step consumes:
//! a square matrix of pairwise semantic similarities in `[0, 1]`, rows and
//! columns indexed by term label, diagonal fixed at `1.0`.
//!
//! # Invariants
//!
//! Enforced at construction, relied upon everywhere else:
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Square, dims == label count | [`Error::DimensionMismatch`] |
//! | No duplicate labels | [`Error::DuplicateLabel`] |
//! | Entries finite, in [0, 1] | [`Error::InvalidSimilarity`] |
//! | Diagonal == 1.0 | [`Error::InvalidSimilarity`] |
//! | Symmetric within 1e-9 | [`Error::Asymmetric`] |
//!
//! Sub-tolerance asymmetry is averaged away, so `sim(a, b) == sim(b, a)`
//! holds exactly after construction.
//!
//! Labels are sorted at construction and rows/columns permuted to match.
//! Every downstream computation indexes the sorted order, which is what
//! makes reduction results independent of the caller's input ordering.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Tolerance for symmetry and diagonal checks.
const TOL: f64 = 1e-9;

/// Square, symmetric pairwise similarity matrix indexed by label.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    /// Labels in ascending order; row/column `i` belongs to `labels[i]`.
    labels: Vec<String>,
    /// n x n similarities, exactly symmetric, diagonal 1.0.
    values: Array2<f64>,
}

impl SimilarityMatrix {
    /// Build a matrix from labels and a square value array.
    ///
    /// Rows and columns of `values` must follow the order of `labels`; both
    /// are permuted into sorted label order internally. Fails on malformed
    /// input rather than repairing it (out-of-range entries are never
    /// clamped, asymmetry beyond tolerance is never averaged).
    pub fn from_values(labels: Vec<String>, values: Array2<f64>) -> Result<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if values.nrows() != values.ncols() {
            return Err(Error::DimensionMismatch {
                expected: values.nrows(),
                found: values.ncols(),
            });
        }
        if values.nrows() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: values.nrows(),
            });
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| labels[a].cmp(&labels[b]));
        for pair in order.windows(2) {
            if labels[pair[0]] == labels[pair[1]] {
                return Err(Error::DuplicateLabel {
                    label: labels[pair[0]].clone(),
                });
            }
        }
        let sorted: Vec<String> = order.iter().map(|&i| labels[i].clone()).collect();
        let raw = Array2::from_shape_fn((n, n), |(i, j)| values[[order[i], order[j]]]);

        let mut out = Array2::zeros((n, n));
        for i in 0..n {
            let d = raw[[i, i]];
            if !d.is_finite() || (d - 1.0).abs() > TOL {
                return Err(Error::InvalidSimilarity {
                    row: sorted[i].clone(),
                    col: sorted[i].clone(),
                    value: d,
                });
            }
            out[[i, i]] = 1.0;
            for j in (i + 1)..n {
                let a = raw[[i, j]];
                let b = raw[[j, i]];
                if !a.is_finite() || !(0.0..=1.0).contains(&a) {
                    return Err(Error::InvalidSimilarity {
                        row: sorted[i].clone(),
                        col: sorted[j].clone(),
                        value: a,
                    });
                }
                if !b.is_finite() || !(0.0..=1.0).contains(&b) {
                    return Err(Error::InvalidSimilarity {
                        row: sorted[j].clone(),
                        col: sorted[i].clone(),
                        value: b,
                    });
                }
                let delta = (a - b).abs();
                if delta > TOL {
                    return Err(Error::Asymmetric {
                        row: sorted[i].clone(),
                        col: sorted[j].clone(),
                        delta,
                    });
                }
                let v = 0.5 * (a + b);
                out[[i, j]] = v;
                out[[j, i]] = v;
            }
        }

        Ok(Self {
            labels: sorted,
            values: out,
        })
    }

    /// Labels in ascending order, one per row/column.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels (matrix dimension).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the matrix holds no labels. Always false for a constructed
    /// matrix; present to pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row/column index of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// Similarity between two labels, `None` if either is absent.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[[i, j]])
    }

    /// Similarity by index.
    pub(crate) fn sim(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    /// The underlying value array, rows/columns in label order.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Restriction of the matrix to a subset of its labels.
    ///
    /// Values are carried over, never recomputed. Duplicates in `keep` are
    /// collapsed; a label the matrix does not contain is
    /// [`Error::UnknownLabel`].
    pub fn submatrix<S: AsRef<str>>(&self, keep: &[S]) -> Result<Self> {
        let mut idx = Vec::with_capacity(keep.len());
        for label in keep {
            let i = self.index_of(label.as_ref()).ok_or_else(|| Error::UnknownLabel {
                label: label.as_ref().to_string(),
            })?;
            idx.push(i);
        }
        idx.sort_unstable();
        idx.dedup();
        if idx.is_empty() {
            return Err(Error::EmptyInput);
        }

        let labels = idx.iter().map(|&i| self.labels[i].clone()).collect();
        let values =
            Array2::from_shape_fn((idx.len(), idx.len()), |(r, c)| self.values[[idx[r], idx[c]]]);
        Ok(Self { labels, values })
    }

    /// Condensed dissimilarity matrix `d = 1 - sim` (upper triangle,
    /// row-major). Length is N-choose-2; the shape `kodama` linkage takes.
    pub fn condensed_distances(&self) -> Vec<f64> {
        let n = self.len();
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for row in 0..n.saturating_sub(1) {
            for col in (row + 1)..n {
                condensed.push(1.0 - self.values[[row, col]]);
            }
        }
        condensed
    }

    /// Mean similarity of label `i` to every other label; 0.0 for a
    /// single-label matrix.
    pub fn mean_offdiagonal(&self, i: usize) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let sum: f64 = self.values.row(i).sum() - self.values[[i, i]];
        sum / (n - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_labels_sorted_with_values() {
        // Labels given out of order; the B-C similarity must follow them.
        let values = Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 0.2, 0.9, //
                0.2, 1.0, 0.3, //
                0.9, 0.3, 1.0,
            ],
        )
        .unwrap();
        let m = SimilarityMatrix::from_values(labels(&["C", "A", "B"]), values).unwrap();

        assert_eq!(m.labels(), &["A", "B", "C"]);
        assert_eq!(m.get("C", "B"), Some(0.3));
        assert_eq!(m.get("A", "C"), Some(0.2));
        assert_eq!(m.get("A", "A"), Some(1.0));
    }

    #[test]
    fn test_rejects_non_square() {
        let values = Array2::zeros((2, 3));
        let err = SimilarityMatrix::from_values(labels(&["A", "B"]), values).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_rejects_label_count_mismatch() {
        let values = Array2::from_elem((3, 3), 1.0);
        let err = SimilarityMatrix::from_values(labels(&["A", "B"]), values).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_label() {
        let values = Array2::from_elem((2, 2), 1.0);
        let err = SimilarityMatrix::from_values(labels(&["A", "A"]), values).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateLabel {
                label: "A".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_asymmetry() {
        let values =
            Array2::from_shape_vec((2, 2), vec![1.0, 0.4, 0.6, 1.0]).unwrap();
        let err = SimilarityMatrix::from_values(labels(&["A", "B"]), values).unwrap_err();
        assert!(matches!(err, Error::Asymmetric { .. }), "{err}");
    }

    #[test]
    fn test_rejects_out_of_range_entry() {
        let values =
            Array2::from_shape_vec((2, 2), vec![1.0, 1.4, 1.4, 1.0]).unwrap();
        let err = SimilarityMatrix::from_values(labels(&["A", "B"]), values).unwrap_err();
        assert!(matches!(err, Error::InvalidSimilarity { .. }), "{err}");
    }

    #[test]
    fn test_rejects_bad_diagonal() {
        let values =
            Array2::from_shape_vec((2, 2), vec![0.5, 0.4, 0.4, 1.0]).unwrap();
        let err = SimilarityMatrix::from_values(labels(&["A", "B"]), values).unwrap_err();
        assert!(matches!(err, Error::InvalidSimilarity { .. }), "{err}");
    }

    #[test]
    fn test_rejects_empty() {
        let values = Array2::zeros((0, 0));
        let err = SimilarityMatrix::from_values(Vec::new(), values).unwrap_err();
        assert_eq!(err, Error::EmptyInput);
    }

    #[test]
    fn test_sub_tolerance_asymmetry_is_symmetrized() {
        let eps = 1e-12;
        let values =
            Array2::from_shape_vec((2, 2), vec![1.0, 0.4 + eps, 0.4 - eps, 1.0]).unwrap();
        let m = SimilarityMatrix::from_values(labels(&["A", "B"]), values).unwrap();
        assert_eq!(m.get("A", "B"), m.get("B", "A"));
    }

    #[test]
    fn test_submatrix() {
        let values = Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 0.9, 0.2, //
                0.9, 1.0, 0.3, //
                0.2, 0.3, 1.0,
            ],
        )
        .unwrap();
        let m = SimilarityMatrix::from_values(labels(&["A", "B", "C"]), values).unwrap();

        let sub = m.submatrix(&["C", "A"]).unwrap();
        assert_eq!(sub.labels(), &["A", "C"]);
        assert_eq!(sub.get("A", "C"), Some(0.2));

        let err = m.submatrix(&["A", "Z"]).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownLabel {
                label: "Z".to_string()
            }
        );
    }

    #[test]
    fn test_condensed_distances() {
        let values = Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 0.9, 0.2, //
                0.9, 1.0, 0.3, //
                0.2, 0.3, 1.0,
            ],
        )
        .unwrap();
        let m = SimilarityMatrix::from_values(labels(&["A", "B", "C"]), values).unwrap();

        let condensed = m.condensed_distances();
        assert_eq!(condensed.len(), 3);
        assert!((condensed[0] - 0.1).abs() < 1e-12); // A-B
        assert!((condensed[1] - 0.8).abs() < 1e-12); // A-C
        assert!((condensed[2] - 0.7).abs() < 1e-12); // B-C
    }

    #[test]
    fn test_mean_offdiagonal() {
        let values = Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 0.9, 0.2, //
                0.9, 1.0, 0.3, //
                0.2, 0.3, 1.0,
            ],
        )
        .unwrap();
        let m = SimilarityMatrix::from_values(labels(&["A", "B", "C"]), values).unwrap();

        assert!((m.mean_offdiagonal(0) - 0.55).abs() < 1e-12);

        let single =
            SimilarityMatrix::from_values(labels(&["A"]), Array2::from_elem((1, 1), 1.0)).unwrap();
        assert_eq!(single.mean_offdiagonal(0), 0.0);
    }
}

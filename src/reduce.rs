//! Term-set reduction: partition, representative selection, assembly.
//!
//! The single externally-facing pipeline over a [`SimilarityMatrix`]:
//!
//! ```text
//! matrix ──► resolve scores ──► agglomerate ──► cut at 1 - threshold
//!                                                      │
//!        assemble ◄── (parent-of-parents pass) ◄── pick representatives
//! ```
//!
//! Each cluster's representative is its highest-scoring member; every
//! label's row records which cluster it fell into, who stands for it, and
//! the fallback scores derived along the way. The whole computation is
//! pure and synchronous; repeated calls with the same matrix and threshold
//! give identical results.
//!
//! ```rust
//! use terse::{calculate_sim_matrix, MapSimilarity, Reducer};
//!
//! let sim = MapSimilarity::new()
//!     .with_pair("GO:0006915", "GO:0012501", 0.9)
//!     .with_pair("GO:0006915", "GO:0008283", 0.2)
//!     .with_pair("GO:0012501", "GO:0008283", 0.2);
//!
//! let matrix =
//!     calculate_sim_matrix(["GO:0006915", "GO:0012501", "GO:0008283"], &sim, None).unwrap();
//! let reduced = Reducer::new().with_threshold(0.7).reduce(&matrix).unwrap();
//!
//! assert_eq!(reduced.n_clusters(), 2);
//! ```

use core::fmt;
use std::collections::BTreeMap;

use crate::cluster::{agglomerate, Linkage};
use crate::error::{Error, Result};
use crate::matrix::SimilarityMatrix;
use crate::ports::Annotations;
use crate::score::{resolve_scores, uniqueness_scores, ScoreSource};

/// Default similarity threshold for cluster cuts.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Flat partition of the matrix labels at a similarity threshold.
///
/// Two labels share a cluster iff their last common merge height in the
/// dendrogram is `<= 1 - threshold`. Returns one dense cluster id per
/// label, aligned with `matrix.labels()`; ids are numbered by each
/// cluster's lexically smallest member.
///
/// A threshold of 1.0 cuts at height 0, so only identical labels merge;
/// thresholds near 0 collapse everything into one cluster.
pub fn partition(
    matrix: &SimilarityMatrix,
    threshold: f64,
    linkage: Linkage,
) -> Result<Vec<usize>> {
    validate_threshold(threshold)?;
    Ok(agglomerate(matrix, linkage).cut_at_distance(1.0 - threshold))
}

/// Representative per cluster: argmax score, lexical tie-break.
///
/// `clusters` and `scores` are aligned with the matrix's sorted label
/// order, so scanning ascending and replacing only on a strict score
/// improvement picks the lexically smallest label among ties. Pure
/// function of its inputs. Returns cluster id -> label index.
pub fn select_representatives(clusters: &[usize], scores: &[f64]) -> BTreeMap<usize, usize> {
    let mut reps: BTreeMap<usize, usize> = BTreeMap::new();
    for (idx, &cluster) in clusters.iter().enumerate() {
        match reps.get(&cluster) {
            Some(&best) if scores[idx] <= scores[best] => {}
            _ => {
                reps.insert(cluster, idx);
            }
        }
    }
    reps
}

/// Reduces a similarity matrix over ontology terms to representative groups.
///
/// Builder-style configuration; [`reduce`](Reducer::reduce) runs the whole
/// pipeline. Defaults: threshold 0.7, complete linkage, uniqueness
/// scoring, no annotation port, no secondary pass.
pub struct Reducer<'a> {
    threshold: f64,
    linkage: Linkage,
    scores: ScoreSource<'a>,
    annotations: Option<&'a dyn Annotations>,
    parent_threshold: Option<f64>,
}

impl<'a> Reducer<'a> {
    /// Create a reducer with default settings.
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            linkage: Linkage::Complete,
            scores: ScoreSource::Uniqueness,
            annotations: None,
            parent_threshold: None,
        }
    }

    /// Set the similarity threshold controlling reduction granularity.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the linkage strategy.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set where per-label scores come from.
    pub fn with_scores(mut self, scores: ScoreSource<'a>) -> Self {
        self.scores = scores;
        self
    }

    /// Supply the annotation port; fills the name/size columns of the
    /// output. Without it those columns stay `None` and raw identifiers
    /// stand in.
    pub fn with_annotations(mut self, annotations: &'a dyn Annotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Enable the parent-of-parents pass: re-cluster the representatives
    /// at this (typically looser) threshold and record the resulting
    /// nested grouping.
    pub fn with_parent_threshold(mut self, threshold: f64) -> Self {
        self.parent_threshold = Some(threshold);
        self
    }

    /// Run the reduction pipeline.
    ///
    /// Either a complete [`ReducedAssignment`] is returned or an error is
    /// raised before any output is produced; there are no partial results.
    pub fn reduce(&self, matrix: &SimilarityMatrix) -> Result<ReducedAssignment> {
        if let Some(t) = self.parent_threshold {
            validate_threshold(t)?;
        }

        let scores = resolve_scores(matrix, &self.scores)?;
        let clusters = partition(matrix, self.threshold, self.linkage)?;
        let reps = select_representatives(&clusters, &scores);
        let uniqueness = uniqueness_scores(matrix);

        let mut rep_labels: Vec<String> = reps
            .values()
            .map(|&i| matrix.labels()[i].clone())
            .collect();
        rep_labels.sort();
        rep_labels.dedup();

        let parents_of_parents = match self.parent_threshold {
            Some(t) => Some(self.group_representatives(matrix, &rep_labels, &scores, t)?),
            None => None,
        };

        let mut rows = Vec::with_capacity(matrix.len());
        for (idx, label) in matrix.labels().iter().enumerate() {
            let cluster = clusters[idx];
            let rep_idx = reps[&cluster];
            let rep_label = &matrix.labels()[rep_idx];

            let (term, size) = match self.annotations {
                Some(ann) => (
                    Some(ann.display_name(label)?),
                    Some(ann.term_size(label)?),
                ),
                None => (None, None),
            };
            let parent_term = match self.annotations {
                Some(ann) => Some(ann.display_name(rep_label)?),
                None => None,
            };
            let super_representative = parents_of_parents.as_ref().map(|groups| {
                groups
                    .get(rep_label)
                    .expect("every representative is grouped by the parent pass")
                    .clone()
            });

            rows.push(AssignmentRow {
                label: label.clone(),
                cluster,
                representative: rep_label.clone(),
                parent_sim: matrix.sim(idx, rep_idx),
                score: scores[idx],
                uniqueness: uniqueness[idx],
                size,
                term,
                parent_term,
                super_representative,
            });
        }

        let reduced = matrix.submatrix(&rep_labels)?;
        Ok(ReducedAssignment {
            rows,
            reduced,
            parents_of_parents,
        })
    }

    /// Parent-of-parents pass: the same partition + selection logic,
    /// recursively applied to the representative set at the secondary
    /// threshold. Similarities come from the original matrix, never
    /// recomputed.
    fn group_representatives(
        &self,
        matrix: &SimilarityMatrix,
        rep_labels: &[String],
        scores: &[f64],
        threshold: f64,
    ) -> Result<BTreeMap<String, String>> {
        if rep_labels.len() == 1 {
            let only = rep_labels[0].clone();
            return Ok(BTreeMap::from([(only.clone(), only)]));
        }

        let sub = matrix.submatrix(rep_labels)?;
        let sub_scores: Vec<f64> = sub
            .labels()
            .iter()
            .map(|l| {
                let i = matrix
                    .index_of(l)
                    .expect("representative label came from this matrix");
                scores[i]
            })
            .collect();
        let sub_clusters = partition(&sub, threshold, self.linkage)?;
        let sub_reps = select_representatives(&sub_clusters, &sub_scores);

        let mut groups = BTreeMap::new();
        for (idx, &cluster) in sub_clusters.iter().enumerate() {
            let rep_idx = sub_reps[&cluster];
            groups.insert(
                sub.labels()[idx].clone(),
                sub.labels()[rep_idx].clone(),
            );
        }
        Ok(groups)
    }
}

impl Default for Reducer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Reducer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("threshold", &self.threshold)
            .field("linkage", &self.linkage)
            .field("scores", &self.scores)
            .field("annotations", &self.annotations.is_some())
            .field("parent_threshold", &self.parent_threshold)
            .finish()
    }
}

/// Final assignment for one input label.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    /// The input label.
    pub label: String,
    /// Dense cluster id.
    pub cluster: usize,
    /// The cluster's representative label (the "parent" term).
    pub representative: String,
    /// Similarity between this label and its representative.
    pub parent_sim: f64,
    /// Resolved score used for representative selection.
    pub score: f64,
    /// Derived uniqueness fallback score (1 - mean similarity to the rest).
    pub uniqueness: f64,
    /// Annotated-set size, when an annotation port was supplied.
    pub size: Option<u64>,
    /// Human-readable name of this label, when available.
    pub term: Option<String>,
    /// Human-readable name of the representative, when available.
    pub parent_term: Option<String>,
    /// This row's representative's own representative from the
    /// parent-of-parents pass, when enabled.
    pub super_representative: Option<String>,
}

/// Output of [`Reducer::reduce`]: one row per input label plus the reduced
/// representative-by-representative similarity matrix.
///
/// Immutable once assembled. Row count equals the input label count, each
/// label exactly once, in label order. The reduced matrix's dimension
/// equals the number of distinct representatives; its values are the
/// original pairwise similarities between representatives.
#[derive(Debug, Clone)]
pub struct ReducedAssignment {
    rows: Vec<AssignmentRow>,
    reduced: SimilarityMatrix,
    parents_of_parents: Option<BTreeMap<String, String>>,
}

impl ReducedAssignment {
    /// All rows, ordered by label.
    pub fn rows(&self) -> &[AssignmentRow] {
        &self.rows
    }

    /// Number of input labels.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the assignment holds no rows. Always false for a produced
    /// assignment; present to pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a specific label.
    pub fn get(&self, label: &str) -> Option<&AssignmentRow> {
        self.rows
            .binary_search_by(|row| row.label.as_str().cmp(label))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// The reduced similarity matrix over distinct representatives.
    pub fn reduced_matrix(&self) -> &SimilarityMatrix {
        &self.reduced
    }

    /// Distinct representative labels, sorted.
    pub fn representatives(&self) -> &[String] {
        self.reduced.labels()
    }

    /// Number of clusters (== number of distinct representatives).
    pub fn n_clusters(&self) -> usize {
        self.reduced.len()
    }

    /// Representative -> super-representative mapping from the
    /// parent-of-parents pass, when it ran.
    pub fn parents_of_parents(&self) -> Option<&BTreeMap<String, String>> {
        self.parents_of_parents.as_ref()
    }

    /// Cluster id -> member labels, for callers that want the grouping
    /// rather than the per-label table.
    pub fn clusters(&self) -> BTreeMap<usize, Vec<&str>> {
        let mut out: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for row in &self.rows {
            out.entry(row.cluster).or_default().push(row.label.as_str());
        }
        out
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(Error::InvalidThreshold { value: threshold });
    }
    Ok(())
}

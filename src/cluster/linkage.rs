//! Linkage strategies for agglomerative clustering.

use kodama::{linkage as kodama_linkage, Method as KodamaMethod};

use crate::cluster::dendrogram::Dendrogram;
use crate::matrix::SimilarityMatrix;

/// Linkage method: how "distance between clusters" is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    Average,
    /// Ward's method: minimize within-cluster variance.
    Ward,
}

impl Default for Linkage {
    fn default() -> Self {
        Linkage::Complete
    }
}

/// Agglomerate a similarity matrix into its full merge tree.
///
/// Distances are `1 - sim` per pair. Clustering runs via kodama
/// (BurntSushi), whose dendrogram uses SciPy/MATLAB-style cluster labels:
/// leaves are `0..n-1`, and the i-th merge creates cluster `n + i`.
/// kodama's merge order is deterministic for a given condensed matrix, and
/// the matrix's sorted labels pin that order down independent of how the
/// caller supplied its labels.
pub fn agglomerate(matrix: &SimilarityMatrix, linkage: Linkage) -> Dendrogram {
    let n = matrix.len();
    if n < 2 {
        return Dendrogram::new(n);
    }

    let mut condensed = matrix.condensed_distances();
    let method = match linkage {
        Linkage::Single => KodamaMethod::Single,
        Linkage::Complete => KodamaMethod::Complete,
        Linkage::Average => KodamaMethod::Average,
        Linkage::Ward => KodamaMethod::Ward,
    };

    let dend = kodama_linkage(&mut condensed, n, method);

    let mut out = Dendrogram::new(n);
    for step in dend.steps() {
        out.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
    }
    out
}

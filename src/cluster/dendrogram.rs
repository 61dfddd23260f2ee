//! Merge-history dendrogram and threshold cuts.
//!
//! Records the complete merge history from agglomerative clustering:
//!
//! ```text
//!         4 (height=0.8)
//!        / \
//!       3   \      (height=0.1)
//!      / \   \
//!     A   B   C    (leaves)
//! ```
//!
//! Cutting at any height yields a flat partition: two leaves share a
//! cluster iff their last common merge sits at or below the cut.

use std::collections::HashMap;

/// A single merge recorded during agglomeration.
///
/// Cluster ids follow the SciPy/MATLAB convention used by `kodama`:
/// leaves are `0..n-1`, and the i-th merge creates cluster `n + i`.
#[derive(Debug, Clone, Copy)]
pub struct Merge {
    /// First cluster being merged.
    pub cluster_a: usize,
    /// Second cluster being merged.
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

/// A dendrogram over `n_items` leaves.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram for `n_items` leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Flat cluster assignments at a height cut, one per leaf.
    ///
    /// Applies every merge with `distance <= height`. Merge heights are
    /// nondecreasing for single/complete/average/Ward linkage, so stopping
    /// at the first merge above the cut is exact. Cluster ids are dense,
    /// numbered in order of each cluster's smallest leaf index, so the
    /// assignment is fully determined by leaf order.
    pub fn cut_at_distance(&self, height: f64) -> Vec<usize> {
        let n = self.n_items;

        // parent[id] points from a merged cluster to the cluster that
        // absorbed it; kodama uses each child id at most once, so chains
        // form a forest.
        let mut parent: Vec<usize> = (0..n + self.merges.len()).collect();
        for (i, merge) in self.merges.iter().enumerate() {
            if merge.distance > height {
                break;
            }
            let new_id = n + i;
            parent[merge.cluster_a] = new_id;
            parent[merge.cluster_b] = new_id;
        }

        let mut dense: HashMap<usize, usize> = HashMap::new();
        let mut out = Vec::with_capacity(n);
        for leaf in 0..n {
            let mut root = leaf;
            while parent[root] != root {
                root = parent[root];
            }
            let next = dense.len();
            out.push(*dense.entry(root).or_insert(next));
        }
        out
    }

    /// Number of leaves.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges in merge order.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }
}

//! # terse
//!
//! Similarity-driven reduction of redundant ontology term sets.
//!
//! Term enrichment over a controlled vocabulary (GO, DO, HPO, ...) tends to
//! return long lists of near-synonymous terms. `terse` collapses such a
//! list into a smaller set of representative groups: cluster the terms by
//! semantic similarity, pick the most important term of each cluster as its
//! representative, and report a parent/child assignment for every term.
//!
//! # Pipeline
//!
//! | Stage | Module | What happens |
//! |-------|--------|--------------|
//! | Build | [`build`] | pairwise lookups assembled into a [`SimilarityMatrix`] |
//! | Score | [`score`] | one score per term (provided, uniqueness, or set size) |
//! | Cluster | [`cluster`] | complete-linkage agglomeration, cut at `1 - threshold` |
//! | Select | [`reduce`] | highest-scoring member represents each cluster |
//! | Assemble | [`reduce`] | per-term table + reduced representative matrix |
//!
//! Similarity computation and term metadata stay behind the [`Similarity`]
//! and [`Annotations`] ports; the reduction itself is pure, synchronous,
//! and deterministic: label order at the input does not affect the result.
//!
//! # Example
//!
//! ```rust
//! use terse::{calculate_sim_matrix, MapSimilarity, Reducer};
//!
//! // Three GO-style terms: two near-duplicates and an outlier.
//! let sim = MapSimilarity::new()
//!     .with_pair("GO:0006915", "GO:0012501", 0.9)
//!     .with_pair("GO:0006915", "GO:0008283", 0.2)
//!     .with_pair("GO:0012501", "GO:0008283", 0.2);
//!
//! let matrix =
//!     calculate_sim_matrix(["GO:0006915", "GO:0012501", "GO:0008283"], &sim, None)?;
//! let reduced = Reducer::new().with_threshold(0.7).reduce(&matrix)?;
//!
//! assert_eq!(reduced.n_clusters(), 2);
//! for row in reduced.rows() {
//!     println!("{} -> cluster {} ({})", row.label, row.cluster, row.representative);
//! }
//! # Ok::<(), terse::Error>(())
//! ```
//!
//! # Choosing a threshold
//!
//! The threshold is the minimum similarity two representatives may have;
//! it controls reduction granularity. 0.9 barely merges, 0.7 (the default)
//! gives a medium reduction, 0.5 and below collapse aggressively. Cutting
//! is monotone: a looser threshold never produces more clusters.
//!
//! # References
//!
//! - Supek et al. (2011). "REVIGO: summarizes and visualizes long lists of
//!   Gene Ontology terms." PLoS ONE.
//! - Schlicker et al. (2006). "A new measure for functional similarity of
//!   gene products based on Gene Ontology." BMC Bioinformatics.

pub mod build;
pub mod cluster;
/// Error types used across `terse`.
pub mod error;
pub mod matrix;
pub mod ports;
pub mod reduce;
pub mod score;


pub use build::calculate_sim_matrix;
#[cfg(feature = "parallel")]
pub use build::calculate_sim_matrix_parallel;
pub use cluster::{agglomerate, Dendrogram, Linkage, Merge};
pub use error::{Error, Result};
pub use matrix::SimilarityMatrix;
pub use ports::{Annotations, MapAnnotations, MapSimilarity, SimCache, Similarity};
pub use reduce::{
    partition, select_representatives, AssignmentRow, ReducedAssignment, Reducer,
    DEFAULT_THRESHOLD,
};
pub use score::{resolve_scores, uniqueness_scores, ScoreSource};

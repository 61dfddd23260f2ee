//! Agglomerative clustering over similarity-derived distances.
//!
//! The reducer's algorithmic heart: convert similarity to distance
//! (`d = 1 - sim`), build the full merge tree bottom-up, then cut it at a
//! height to get a flat partition.
//!
//! ## Why complete linkage
//!
//! Semantic similarity need not satisfy the triangle inequality, so
//! `1 - sim` is not guaranteed to be a metric. Complete linkage only ever
//! needs pairwise distances and a max-merge rule, no metric properties,
//! which is why it is the reducer's default. The [`Linkage`] strategy
//! swaps in alternatives without touching the cutting/assembly logic.
//!
//! | Linkage | Inter-cluster distance | Effect |
//! |---------|------------------------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact clusters, non-metric safe |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Ward | variance increase | Equal-sized compact clusters |

mod dendrogram;
mod linkage;

pub use dendrogram::{Dendrogram, Merge};
pub use linkage::{agglomerate, Linkage};

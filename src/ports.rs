//! Capability ports for the external collaborators.
//!
//! The reduction core is pure and offline; everything that touches the
//! outside world sits behind one of two narrow traits:
//!
//! - [`Similarity`]: the semantic-similarity service that scores a pair of
//!   term identifiers for a given ontology.
//! - [`Annotations`]: the annotation database that resolves a term to its
//!   human-readable name, annotated-set size, and ancestor set.
//!
//! Production implementations wrap whatever network or database client the
//! application uses. The in-memory [`MapSimilarity`] and [`MapAnnotations`]
//! doubles back deterministic unit tests and small offline runs.
//!
//! Collaborator failures surface as [`Error::Lookup`] and are propagated,
//! never silently defaulted to zero. Retry/backoff, if wanted, belongs to
//! the caller wrapping its port implementation; the core performs none.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::matrix::SimilarityMatrix;

/// Pairwise semantic similarity between two term identifiers.
pub trait Similarity {
    /// Similarity of `a` and `b` in `[0, 1]`.
    fn similarity(&self, a: &str, b: &str) -> Result<f64>;
}

/// Term metadata from the annotation collaborator.
pub trait Annotations {
    /// Human-readable name of a term.
    fn display_name(&self, label: &str) -> Result<String>;

    /// Number of entities annotated to the term.
    fn term_size(&self, label: &str) -> Result<u64>;

    /// All ancestors of a term under the ontology's parent relation.
    fn ancestors(&self, label: &str) -> Result<BTreeSet<String>>;
}

/// In-memory [`Similarity`] backed by a map of unordered pairs.
///
/// Identical labels score 1.0 without a stored entry; an unrecorded pair is
/// a lookup failure, matching the contract that missing similarities are an
/// error rather than a silent zero.
#[derive(Debug, Clone, Default)]
pub struct MapSimilarity {
    pairs: BTreeMap<(String, String), f64>,
}

impl MapSimilarity {
    /// Create an empty similarity map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pairwise similarity (order-insensitive).
    pub fn with_pair(
        mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        sim: f64,
    ) -> Self {
        self.insert(a, b, sim);
        self
    }

    /// Record a pairwise similarity (order-insensitive).
    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>, sim: f64) {
        self.pairs.insert(pair_key(a.into(), b.into()), sim);
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairs are recorded.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Similarity for MapSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        if a == b {
            return Ok(1.0);
        }
        self.pairs
            .get(&pair_key(a.to_string(), b.to_string()))
            .copied()
            .ok_or_else(|| Error::Lookup {
                label: a.to_string(),
                message: format!("no similarity recorded against '{b}'"),
            })
    }
}

/// In-memory [`Annotations`] double.
#[derive(Debug, Clone, Default)]
pub struct MapAnnotations {
    names: BTreeMap<String, String>,
    sizes: BTreeMap<String, u64>,
    ancestors: BTreeMap<String, BTreeSet<String>>,
}

impl MapAnnotations {
    /// Create an empty annotation map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a term's display name and annotated-set size.
    pub fn with_term(
        mut self,
        label: impl Into<String>,
        name: impl Into<String>,
        size: u64,
    ) -> Self {
        let label = label.into();
        self.names.insert(label.clone(), name.into());
        self.sizes.insert(label, size);
        self
    }

    /// Record a term's ancestor set.
    pub fn with_ancestors<I, S>(mut self, label: impl Into<String>, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestors
            .insert(label.into(), ancestors.into_iter().map(Into::into).collect());
        self
    }
}

impl Annotations for MapAnnotations {
    fn display_name(&self, label: &str) -> Result<String> {
        self.names.get(label).cloned().ok_or_else(|| Error::Lookup {
            label: label.to_string(),
            message: "term not annotated".to_string(),
        })
    }

    fn term_size(&self, label: &str) -> Result<u64> {
        self.sizes.get(label).copied().ok_or_else(|| Error::Lookup {
            label: label.to_string(),
            message: "term not annotated".to_string(),
        })
    }

    fn ancestors(&self, label: &str) -> Result<BTreeSet<String>> {
        // A term with no recorded ancestry is a root, not an error.
        Ok(self.ancestors.get(label).cloned().unwrap_or_default())
    }
}

/// Caller-owned cache of pairwise similarities.
///
/// The matrix builder only ever reads it (`Option<&SimCache>`); the caller
/// decides when and what to store, typically by absorbing a matrix it has
/// already paid for. Keys are order-normalized so `(a, b)` and `(b, a)`
/// share one entry.
#[derive(Debug, Clone, Default)]
pub struct SimCache {
    entries: BTreeMap<(String, String), f64>,
}

impl SimCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one pairwise similarity.
    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>, sim: f64) {
        self.entries.insert(pair_key(a.into(), b.into()), sim);
    }

    /// Cached similarity for a pair, if present. Identical labels hit
    /// without an entry.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            return Some(1.0);
        }
        self.entries
            .get(&pair_key(a.to_string(), b.to_string()))
            .copied()
    }

    /// Store every pair of an already-built matrix.
    pub fn absorb(&mut self, matrix: &SimilarityMatrix) {
        let labels = matrix.labels();
        for i in 0..labels.len() {
            for j in (i + 1)..labels.len() {
                self.insert(labels[i].clone(), labels[j].clone(), matrix.sim(i, j));
            }
        }
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn pair_key(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_similarity_symmetric_lookup() {
        let sim = MapSimilarity::new().with_pair("A", "B", 0.8);

        assert_eq!(sim.similarity("A", "B").unwrap(), 0.8);
        assert_eq!(sim.similarity("B", "A").unwrap(), 0.8);
        assert_eq!(sim.similarity("A", "A").unwrap(), 1.0);
    }

    #[test]
    fn test_map_similarity_missing_pair_is_lookup_error() {
        let sim = MapSimilarity::new().with_pair("A", "B", 0.8);
        let err = sim.similarity("A", "C").unwrap_err();
        assert!(matches!(err, Error::Lookup { .. }), "{err}");
    }

    #[test]
    fn test_map_annotations() {
        let ann = MapAnnotations::new()
            .with_term("GO:0006915", "apoptotic process", 1600)
            .with_ancestors("GO:0006915", ["GO:0012501", "GO:0008150"]);

        assert_eq!(
            ann.display_name("GO:0006915").unwrap(),
            "apoptotic process"
        );
        assert_eq!(ann.term_size("GO:0006915").unwrap(), 1600);
        assert_eq!(ann.ancestors("GO:0006915").unwrap().len(), 2);
        // Unrecorded ancestry means root, not failure.
        assert!(ann.ancestors("GO:0008150").unwrap().is_empty());
        assert!(ann.display_name("GO:0000000").is_err());
    }

    #[test]
    fn test_sim_cache() {
        let mut cache = SimCache::new();
        assert!(cache.is_empty());
        cache.insert("B", "A", 0.5);

        assert_eq!(cache.get("A", "B"), Some(0.5));
        assert_eq!(cache.get("B", "A"), Some(0.5));
        assert_eq!(cache.get("A", "A"), Some(1.0));
        assert_eq!(cache.get("A", "C"), None);
        assert_eq!(cache.len(), 1);
    }
}

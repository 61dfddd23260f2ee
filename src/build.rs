//! Matrix Builder: assemble a [`SimilarityMatrix`] from the similarity port.
//!
//! Thin orchestration over the external collaborator: one lookup per
//! unordered label pair, both triangles filled from it, diagonal fixed at
//! 1.0. A caller-owned [`SimCache`] can satisfy pairs without touching the
//! port; the builder never writes to it.
//!
//! With the `parallel` feature, [`calculate_sim_matrix_parallel`] fans the
//! pairwise lookups out across threads. Each lookup is independent and
//! read-only, and results are written back in fixed (row, col) order, so
//! the built matrix is identical regardless of completion order.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::matrix::SimilarityMatrix;
use crate::ports::{SimCache, Similarity};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Build the pairwise similarity matrix for a set of labels.
///
/// Labels are deduplicated and sorted; an empty set is
/// [`Error::EmptyInput`]. A port failure propagates as [`Error::Lookup`];
/// out-of-range port values are rejected, not clamped.
pub fn calculate_sim_matrix<S, I, L>(
    labels: I,
    sim: &S,
    cache: Option<&SimCache>,
) -> Result<SimilarityMatrix>
where
    S: Similarity + ?Sized,
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    let labels = sorted_unique_labels(labels)?;
    let n = labels.len();

    let mut values = Array2::from_elem((n, n), 1.0);
    for i in 0..n {
        for j in (i + 1)..n {
            let v = pair_similarity(&labels, i, j, sim, cache)?;
            values[[i, j]] = v;
            values[[j, i]] = v;
        }
    }
    SimilarityMatrix::from_values(labels, values)
}

/// [`calculate_sim_matrix`] with pairwise lookups fanned out via rayon.
///
/// Worth it when the port crosses a process or network boundary; for an
/// in-memory port the sequential builder is usually faster.
#[cfg(feature = "parallel")]
pub fn calculate_sim_matrix_parallel<S, I, L>(
    labels: I,
    sim: &S,
    cache: Option<&SimCache>,
) -> Result<SimilarityMatrix>
where
    S: Similarity + Sync + ?Sized,
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    let labels = sorted_unique_labels(labels)?;
    let n = labels.len();

    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    let computed = pairs
        .par_iter()
        .map(|&(i, j)| pair_similarity(&labels, i, j, sim, cache))
        .collect::<Result<Vec<f64>>>()?;

    // Assembly stays in (row, col) order.
    let mut values = Array2::from_elem((n, n), 1.0);
    for (&(i, j), &v) in pairs.iter().zip(computed.iter()) {
        values[[i, j]] = v;
        values[[j, i]] = v;
    }
    SimilarityMatrix::from_values(labels, values)
}

fn sorted_unique_labels<I, L>(labels: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    labels.sort();
    labels.dedup();
    if labels.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(labels)
}

fn pair_similarity<S: Similarity + ?Sized>(
    labels: &[String],
    i: usize,
    j: usize,
    sim: &S,
    cache: Option<&SimCache>,
) -> Result<f64> {
    let (a, b) = (&labels[i], &labels[j]);
    let value = match cache.and_then(|c| c.get(a, b)) {
        Some(v) => v,
        None => sim.similarity(a, b)?,
    };
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidSimilarity {
            row: a.clone(),
            col: b.clone(),
            value,
        });
    }
    Ok(value)
}

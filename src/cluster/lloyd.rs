//! Lloyd iteration steps: assignment, centroid update, convergence check.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::distance::{distance, squared_distance};
use super::feature::{Centroid, FeatureVector, N_FEATURES};
use crate::error::{Error, Result};

/// Point indices grouped by centroid index.
///
/// `clusters[c]` lists, in input order, the indices of the points nearest to
/// centroid `c`. Indices refer into the caller's point (and record) slice.
pub type Clusters = Vec<Vec<usize>>;

/// Index and distance of the centroid nearest to `point`.
///
/// Ties go to the lowest index.
#[inline]
pub fn nearest(point: &FeatureVector, centroids: &[Centroid]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = distance(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    (best, best_dist)
}

/// Nearest-centroid label for every point, index-aligned with `data`.
#[cfg(not(feature = "parallel"))]
pub fn nearest_labels(data: &[FeatureVector], centroids: &[Centroid]) -> Vec<usize> {
    data.iter().map(|p| nearest(p, centroids).0).collect()
}

/// Nearest-centroid label for every point, index-aligned with `data`.
///
/// Points are scanned in parallel; each point's own scan is sequential, so
/// the lowest-index tie-break is unchanged.
#[cfg(feature = "parallel")]
pub fn nearest_labels(data: &[FeatureVector], centroids: &[Centroid]) -> Vec<usize> {
    data.par_iter().map(|p| nearest(p, centroids).0).collect()
}

/// Partition `data` into `centroids.len()` groups by nearest centroid.
pub fn assign(data: &[FeatureVector], centroids: &[Centroid]) -> Clusters {
    let mut clusters: Clusters = vec![Vec::new(); centroids.len()];
    for (i, label) in nearest_labels(data, centroids).into_iter().enumerate() {
        clusters[label].push(i);
    }
    clusters
}

/// Recompute each centroid as the mean of its cluster's points.
///
/// An empty cluster keeps its previous centroid unchanged.
pub fn update(
    data: &[FeatureVector],
    clusters: &[Vec<usize>],
    previous: &[Centroid],
) -> Result<Vec<Centroid>> {
    if clusters.len() != previous.len() {
        return Err(Error::CentroidCountMismatch {
            expected: previous.len(),
            found: clusters.len(),
        });
    }

    Ok(clusters
        .iter()
        .zip(previous)
        .map(|(members, prev)| {
            if members.is_empty() {
                return *prev;
            }
            let mut sum = [0.0; N_FEATURES];
            for &i in members {
                for (s, v) in sum.iter_mut().zip(data[i].to_array()) {
                    *s += v;
                }
            }
            let count = members.len() as f64;
            FeatureVector::from_array(sum.map(|s| s / count))
        })
        .collect())
}

/// True iff every centroid moved at most `threshold`.
pub fn has_converged(old: &[Centroid], new: &[Centroid], threshold: f64) -> Result<bool> {
    if old.len() != new.len() {
        return Err(Error::CentroidCountMismatch {
            expected: old.len(),
            found: new.len(),
        });
    }
    Ok(old
        .iter()
        .zip(new)
        .all(|(o, n)| distance(o, n) <= threshold))
}

/// Largest centroid movement between two aligned centroid sets.
pub(crate) fn max_shift(old: &[Centroid], new: &[Centroid]) -> f64 {
    old.iter()
        .zip(new)
        .map(|(o, n)| distance(o, n))
        .fold(0.0, f64::max)
}

/// Within-cluster sum of squared distances for the given labels.
pub(crate) fn inertia(data: &[FeatureVector], labels: &[usize], centroids: &[Centroid]) -> f64 {
    data.iter()
        .zip(labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum()
}

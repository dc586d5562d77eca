//! k-means++ seeding (Arthur & Vassilvitskii, 2007).
//!
//! 1. Pick the first centroid uniformly at random.
//! 2. For every point, let `D(x)` be the distance to the nearest centroid
//!    chosen so far.
//! 3. Pick the next centroid with probability proportional to `D(x)²`.
//! 4. Repeat until `k` centroids are chosen.
//!
//! The `D²` weighting favors points far from existing centroids, which gives an
//! `O(log k)`-competitive start and usually far fewer Lloyd iterations than
//! uniform seeding.
//!
//! Sampling is with replacement: when `k` exceeds the number of distinct
//! points, every remaining weight is zero and the draw falls on the first point
//! again, so duplicate centroids are possible.

use rand::prelude::*;

use super::distance::squared_distance;
use super::feature::{Centroid, FeatureVector};
use crate::error::{Error, Result};

/// Seed `k` centroids from `data` with a generator seeded from `seed`.
///
/// Two calls with the same `data`, `k`, and `seed` return identical centroids.
pub fn initialize(data: &[FeatureVector], k: usize, seed: u64) -> Result<Vec<Centroid>> {
    let mut rng = StdRng::seed_from_u64(seed);
    initialize_with_rng(data, k, &mut rng)
}

/// Seed `k` centroids from `data`, drawing from `rng`.
///
/// Only two primitives are used: a uniform index in `0..data.len()` for the
/// first pick, and uniform `[0, 1)` draws for every later pick.
pub fn initialize_with_rng<R: Rng + ?Sized>(
    data: &[FeatureVector],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Centroid>> {
    if k == 0 {
        return Err(Error::InvalidConfiguration {
            name: "k",
            message: "must be at least 1",
        });
    }
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..n)]);

    // min_d2[i] = squared distance from point i to its nearest chosen centroid.
    let mut min_d2 = vec![f64::INFINITY; n];

    while centroids.len() < k {
        let last = centroids[centroids.len() - 1];
        for (d2, point) in min_d2.iter_mut().zip(data) {
            let d = squared_distance(point, &last);
            if d < *d2 {
                *d2 = d;
            }
        }

        let idx = sample_weighted(&min_d2, rng);
        centroids.push(data[idx]);
    }

    Ok(centroids)
}

/// Cumulative-sum draw: the first index whose running weight reaches
/// `u * total`, with `u` uniform in `[0, 1)`.
fn sample_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let target = rng.random::<f64>() * total;

    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= target {
            return i;
        }
    }

    // Summation order can leave the running total a few ulps short of `total`.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_points() -> Vec<FeatureVector> {
        vec![
            FeatureVector::new(-1.224744871391589, -1.224744871391589, -1.224744871391589),
            FeatureVector::new(0.0, 0.0, 0.0),
            FeatureVector::new(1.224744871391589, 1.224744871391589, 1.224744871391589),
        ]
    }

    #[test]
    fn deterministic_with_seed() {
        let data = three_points();
        let a = initialize(&data, 2, 42).unwrap();
        let b = initialize(&data, 2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn returns_k_data_points() {
        let data: Vec<FeatureVector> = (0..20)
            .map(|i| FeatureVector::new(i as f64, (i * i) as f64, -(i as f64)))
            .collect();
        let centroids = initialize(&data, 5, 7).unwrap();
        assert_eq!(centroids.len(), 5);
        for c in &centroids {
            assert!(data.contains(c), "centroid {c:?} is not a data point");
        }
    }

    #[test]
    fn well_separated_groups_get_one_seed_each() {
        let data = vec![
            FeatureVector::new(0.0, 0.0, 0.0),
            FeatureVector::new(0.1, 0.0, 0.0),
            FeatureVector::new(100.0, 100.0, 100.0),
            FeatureVector::new(100.1, 100.0, 100.0),
        ];
        // The D² weight of the far group dominates for any seed.
        for seed in 0..20 {
            let c = initialize(&data, 2, seed).unwrap();
            let near = c.iter().filter(|p| p.age < 50.0).count();
            assert_eq!(near, 1, "seed {seed}: {c:?}");
        }
    }

    #[test]
    fn k_larger_than_data_duplicates() {
        let data = vec![FeatureVector::new(1.0, 2.0, 3.0)];
        let c = initialize(&data, 3, 1).unwrap();
        assert_eq!(c, vec![data[0]; 3]);
    }

    #[test]
    fn invalid_inputs() {
        let data = three_points();
        assert!(matches!(
            initialize(&data, 0, 42),
            Err(Error::InvalidConfiguration { name: "k", .. })
        ));
        assert!(matches!(initialize(&[], 2, 42), Err(Error::EmptyInput)));
    }

    #[test]
    fn zero_weights_pick_first_point() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sample_weighted(&[0.0, 0.0, 0.0], &mut rng), 0);
    }

    #[test]
    fn zero_weight_points_are_never_chosen() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let i = sample_weighted(&[0.0, 2.0, 0.0, 1.0], &mut rng);
            assert!(i == 1 || i == 3, "picked zero-weight index {i}");
        }
    }
}

//! Euclidean distance over the three normalized features.

use super::feature::FeatureVector;

/// Squared Euclidean distance.
#[inline]
pub fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance: `sqrt(Σ (a_i - b_i)²)`.
#[inline]
pub fn distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    squared_distance(a, b).sqrt()
}

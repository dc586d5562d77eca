//! Feature vectors and standardization.
//!
//! Every feature is rescaled to zero mean and unit (population) standard
//! deviation before any distance is computed, so that income (tens of
//! thousands) does not drown out age (tens).
//!
//! ```text
//! z = (x - mean) / std        std = sqrt(Σ (x - mean)² / n)
//! ```
//!
//! A constant feature has `std = 0`. It carries no information, and every value
//! of that feature maps to exactly `0` instead of dividing by zero.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Number of clustered features.
pub const N_FEATURES: usize = 3;

/// A normalized `(age, income, purchase_amount)` point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Standardized age.
    pub age: f64,
    /// Standardized income.
    pub income: f64,
    /// Standardized purchase amount.
    pub purchase_amount: f64,
}

/// The mean position of a cluster in normalized space.
pub type Centroid = FeatureVector;

impl FeatureVector {
    /// Create a feature vector from its three components.
    pub const fn new(age: f64, income: f64, purchase_amount: f64) -> Self {
        Self {
            age,
            income,
            purchase_amount,
        }
    }

    /// Components in feature order.
    #[inline]
    pub fn to_array(self) -> [f64; N_FEATURES] {
        [self.age, self.income, self.purchase_amount]
    }

    /// Build from components in feature order.
    #[inline]
    pub fn from_array(a: [f64; N_FEATURES]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<[f64; N_FEATURES]> for FeatureVector {
    fn from(a: [f64; N_FEATURES]) -> Self {
        Self::from_array(a)
    }
}

/// Mean and population standard deviation of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divisor `n`, not `n - 1`).
    pub std_dev: f64,
}

impl Moments {
    fn of(values: impl Iterator<Item = f64> + Clone) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.clone() {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / n as f64;

        // Rounding in `sum / n` can leave a constant column with a tiny nonzero
        // variance. Pin it to zero.
        if min == max {
            return Self { mean: min, std_dev: 0.0 };
        }
        let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

        Self {
            mean,
            std_dev: var.sqrt(),
        }
    }

    /// Standardize one raw value. Always `0` for a zero-variance feature.
    #[inline]
    pub fn scale(&self, raw: f64) -> f64 {
        if self.std_dev == 0.0 {
            return 0.0;
        }
        (raw - self.mean) / self.std_dev
    }
}

/// Per-feature statistics computed once per fit over the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Age moments.
    pub age: Moments,
    /// Income moments.
    pub income: Moments,
    /// Purchase amount moments.
    pub purchase_amount: Moments,
}

impl FeatureStats {
    /// Compute statistics over `records`. Returns `None` for an empty slice.
    pub fn fit<I>(records: &[Record<I>]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        Some(Self {
            age: Moments::of(records.iter().map(|r| r.age)),
            income: Moments::of(records.iter().map(|r| r.income)),
            purchase_amount: Moments::of(records.iter().map(|r| r.purchase_amount)),
        })
    }

    /// Normalize a single record with these statistics.
    pub fn transform<I>(&self, record: &Record<I>) -> FeatureVector {
        FeatureVector::new(
            self.age.scale(record.age),
            self.income.scale(record.income),
            self.purchase_amount.scale(record.purchase_amount),
        )
    }

    /// Normalize every record, index-aligned with the input.
    pub fn transform_all<I>(&self, records: &[Record<I>]) -> Vec<FeatureVector> {
        records.iter().map(|r| self.transform(r)).collect()
    }
}

/// Standardize `records` into zero-mean, unit-variance feature vectors.
///
/// The output is index-aligned with the input. An empty slice yields an empty
/// vector.
pub fn normalize<I>(records: &[Record<I>]) -> Vec<FeatureVector> {
    match FeatureStats::fit(records) {
        Some(stats) => stats.transform_all(records),
        None => Vec::new(),
    }
}

/// Number of distinct raw feature triples in `records`.
pub(crate) fn distinct_points<I>(records: &[Record<I>]) -> usize {
    // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
    records
        .iter()
        .map(|r| r.features().map(|v| (v + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

//! K-means over customer records: normalize, seed with k-means++, run Lloyd
//! iterations, then label every record against the final centroids.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::feature::{distinct_points, Centroid, FeatureStats};
use super::init;
use super::lloyd;
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::record::Record;

/// Default number of clusters.
pub const DEFAULT_K: usize = 5;
/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 300;
/// Default convergence threshold (maximum per-centroid movement).
pub const DEFAULT_TOL: f64 = 1e-4;
/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Final `customer_id -> cluster index` mapping.
///
/// If two records share a `customer_id`, the later one's label wins.
pub type LabelMap<I> = HashMap<I, usize>;

/// What to do when `k` exceeds the number of distinct points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterCountPolicy {
    /// Allow it; k-means++ may then pick the same point more than once.
    #[default]
    Lenient,
    /// Reject with [`Error::InvalidClusterCount`].
    Strict,
}

/// How a fit terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStatus {
    /// No records were supplied; nothing was clustered.
    EmptyInput,
    /// Every centroid moved at most the threshold in the last iteration.
    Converged {
        /// Iterations consumed, including the converging one.
        iterations: usize,
    },
    /// The iteration cap was hit first. The result is still usable.
    IterationLimitReached {
        /// Iterations consumed (the cap).
        iterations: usize,
    },
}

impl FitStatus {
    /// Iterations consumed.
    pub fn iterations(&self) -> usize {
        match *self {
            FitStatus::EmptyInput => 0,
            FitStatus::Converged { iterations }
            | FitStatus::IterationLimitReached { iterations } => iterations,
        }
    }

    /// Whether the convergence threshold was met.
    pub fn converged(&self) -> bool {
        matches!(self, FitStatus::Converged { .. })
    }
}

/// Output of [`Kmeans::fit`].
#[derive(Debug, Clone)]
pub struct KmeansFit<I> {
    /// `customer_id -> cluster index`.
    pub labels: LabelMap<I>,
    /// Cluster index per input record, index-aligned with the input.
    pub assignments: Vec<usize>,
    /// Final centroids in normalized space. Empty for an empty input.
    pub centroids: Vec<Centroid>,
    /// Normalization statistics. `None` for an empty input.
    pub stats: Option<FeatureStats>,
    /// Termination status.
    pub status: FitStatus,
    /// Within-cluster sum of squared distances in normalized space.
    pub inertia: f64,
}

impl<I> KmeansFit<I> {
    fn empty() -> Self {
        Self {
            labels: HashMap::new(),
            assignments: Vec::new(),
            centroids: Vec::new(),
            stats: None,
            status: FitStatus::EmptyInput,
            inertia: 0.0,
        }
    }

    /// Whether the fit converged before the iteration cap.
    pub fn converged(&self) -> bool {
        self.status.converged()
    }

    /// Iterations consumed.
    pub fn iterations(&self) -> usize {
        self.status.iterations()
    }

    /// Consume the fit, keeping only the label map.
    pub fn into_labels(self) -> LabelMap<I> {
        self.labels
    }

    /// Label new records against the fitted centroids.
    ///
    /// New records are normalized with the statistics of the fitted data, not
    /// their own. Fails with [`Error::EmptyInput`] if the fit saw no records.
    pub fn predict<J>(&self, records: &[Record<J>]) -> Result<Vec<usize>> {
        let stats = self.stats.as_ref().ok_or(Error::EmptyInput)?;
        let data = stats.transform_all(records);
        Ok(lloyd::nearest_labels(&data, &self.centroids))
    }
}

/// K-means clusterer with k-means++ seeding.
///
/// ```rust
/// use segmenter::{Kmeans, Record};
///
/// let records = vec![
///     Record::new("a", 22.0, 28_000.0, 900.0),
///     Record::new("b", 24.0, 31_000.0, 1_100.0),
///     Record::new("c", 58.0, 95_000.0, 4_200.0),
///     Record::new("d", 61.0, 99_000.0, 4_000.0),
/// ];
///
/// let fit = Kmeans::new(2).with_seed(7).fit(&records).unwrap();
/// assert_eq!(fit.labels["a"], fit.labels["b"]);
/// assert_ne!(fit.labels["a"], fit.labels["c"]);
/// assert!(fit.converged());
/// ```
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    tol: f64,
    seed: u64,
    policy: ClusterCountPolicy,
}

impl Kmeans {
    /// Create a clusterer for `k` clusters with default settings.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            seed: DEFAULT_SEED,
            policy: ClusterCountPolicy::default(),
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence threshold.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the RNG seed used for k-means++ seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the policy for `k` larger than the number of distinct points.
    pub fn with_cluster_count_policy(mut self, policy: ClusterCountPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Iteration cap.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Convergence threshold.
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Cluster count policy.
    pub fn cluster_count_policy(&self) -> ClusterCountPolicy {
        self.policy
    }

    /// Check the configuration without fitting.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfiguration {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidConfiguration {
                name: "max_iterations",
                message: "must be at least 1",
            });
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(Error::InvalidConfiguration {
                name: "convergence_threshold",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Cluster `records`.
    ///
    /// An empty slice is valid and yields an empty label map with
    /// [`FitStatus::EmptyInput`]. Hitting the iteration cap is reported through
    /// [`FitStatus::IterationLimitReached`], not as an error.
    pub fn fit<I>(&self, records: &[Record<I>]) -> Result<KmeansFit<I>>
    where
        I: Clone + Eq + Hash,
    {
        self.run(records, None)
    }

    /// Like [`Kmeans::fit`], but stops with [`Error::Cancelled`] once `cancel`
    /// is observed set at an iteration boundary.
    pub fn fit_with_cancel<I>(
        &self,
        records: &[Record<I>],
        cancel: &AtomicBool,
    ) -> Result<KmeansFit<I>>
    where
        I: Clone + Eq + Hash,
    {
        self.run(records, Some(cancel))
    }

    #[instrument(level = "debug", name = "kmeans_fit", skip_all, fields(k = self.k, n = records.len()))]
    fn run<I>(&self, records: &[Record<I>], cancel: Option<&AtomicBool>) -> Result<KmeansFit<I>>
    where
        I: Clone + Eq + Hash,
    {
        self.validate()?;

        let Some(stats) = FeatureStats::fit(records) else {
            debug!("no records; returning empty labels");
            return Ok(KmeansFit::empty());
        };

        if self.policy == ClusterCountPolicy::Strict {
            let distinct = distinct_points(records);
            if self.k > distinct {
                return Err(Error::InvalidClusterCount {
                    requested: self.k,
                    n_items: distinct,
                });
            }
        }

        let data = stats.transform_all(records);
        debug!(?stats, "normalized features");

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = init::initialize_with_rng(&data, self.k, &mut rng)?;
        debug!(seed = self.seed, "seeded centroids with k-means++");

        let mut status = FitStatus::IterationLimitReached {
            iterations: self.max_iter,
        };
        for iter in 0..self.max_iter {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                debug!(iterations = iter, "fit cancelled");
                return Err(Error::Cancelled { iterations: iter });
            }

            let clusters = lloyd::assign(&data, &centroids);
            let next = lloyd::update(&data, &clusters, &centroids)?;
            let converged = lloyd::has_converged(&centroids, &next, self.tol)?;
            debug!(
                iteration = iter + 1,
                shift = lloyd::max_shift(&centroids, &next),
                empty_clusters = clusters.iter().filter(|c| c.is_empty()).count(),
                "lloyd iteration"
            );
            centroids = next;

            if converged {
                status = FitStatus::Converged {
                    iterations: iter + 1,
                };
                break;
            }
        }

        match status {
            FitStatus::Converged { iterations } => {
                info!(iterations, "k-means converged");
            }
            _ => warn!(
                max_iter = self.max_iter,
                tol = self.tol,
                "k-means hit the iteration limit before converging"
            ),
        }

        // The last round assigned against the pre-update centroids; relabel so
        // labels agree with the centroids we return.
        let assignments = lloyd::nearest_labels(&data, &centroids);
        let inertia = lloyd::inertia(&data, &assignments, &centroids);
        let labels = records
            .iter()
            .zip(&assignments)
            .map(|(r, &label)| (r.customer_id.clone(), label))
            .collect();

        Ok(KmeansFit {
            labels,
            assignments,
            centroids,
            stats: Some(stats),
            status,
            inertia,
        })
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl Clustering for Kmeans {
    fn fit_predict<I>(&self, records: &[Record<I>]) -> Result<Vec<usize>>
    where
        I: Clone + Eq + Hash,
    {
        Ok(self.fit(records)?.assignments)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Vec<Record<u32>> {
        vec![
            Record::new(1, 20.0, 30_000.0, 1_000.0),
            Record::new(2, 21.0, 31_000.0, 1_050.0),
            Record::new(3, 22.0, 29_500.0, 980.0),
            Record::new(4, 60.0, 120_000.0, 5_000.0),
            Record::new(5, 61.0, 118_000.0, 5_100.0),
            Record::new(6, 59.0, 121_000.0, 4_950.0),
        ]
    }

    #[test]
    fn separates_two_groups() {
        let data = two_groups();
        let fit = Kmeans::new(2).with_seed(42).fit(&data).unwrap();

        assert!(fit.converged());
        assert!(fit.iterations() < DEFAULT_MAX_ITER);
        assert_eq!(fit.labels.len(), 6);

        let a = fit.labels[&1];
        let b = fit.labels[&4];
        assert_ne!(a, b);
        for id in [2, 3] {
            assert_eq!(fit.labels[&id], a);
        }
        for id in [5, 6] {
            assert_eq!(fit.labels[&id], b);
        }
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let data: Vec<Record<u32>> = Vec::new();
        let fit = Kmeans::new(3).fit(&data).unwrap();
        assert!(fit.labels.is_empty());
        assert_eq!(fit.status, FitStatus::EmptyInput);
        assert!(fit.predict(&two_groups()).is_err());
    }

    #[test]
    fn invalid_configuration() {
        let data = two_groups();
        assert!(matches!(
            Kmeans::new(0).fit(&data),
            Err(Error::InvalidConfiguration { name: "k", .. })
        ));
        assert!(matches!(
            Kmeans::new(2).with_max_iter(0).fit(&data),
            Err(Error::InvalidConfiguration { name: "max_iterations", .. })
        ));
        assert!(Kmeans::new(2).with_tol(-1.0).fit(&data).is_err());
        assert!(Kmeans::new(2).with_tol(f64::NAN).fit(&data).is_err());
        // k = 0 is rejected even with nothing to cluster.
        assert!(Kmeans::new(0).fit::<u32>(&[]).is_err());
    }

    #[test]
    fn lenient_policy_allows_k_above_distinct_points() {
        let data = vec![
            Record::new(1, 30.0, 40_000.0, 2_000.0),
            Record::new(2, 30.0, 40_000.0, 2_000.0),
        ];
        let fit = Kmeans::new(3).fit(&data).unwrap();
        assert_eq!(fit.centroids.len(), 3);
        assert_eq!(fit.labels[&1], 0);
        assert_eq!(fit.labels[&2], 0);
    }

    #[test]
    fn strict_policy_rejects_k_above_distinct_points() {
        let data = vec![
            Record::new(1, 30.0, 40_000.0, 2_000.0),
            Record::new(2, 30.0, 40_000.0, 2_000.0),
            Record::new(3, 31.0, 40_000.0, 2_000.0),
        ];
        let model = Kmeans::new(3).with_cluster_count_policy(ClusterCountPolicy::Strict);
        assert!(matches!(
            model.fit(&data),
            Err(Error::InvalidClusterCount {
                requested: 3,
                n_items: 2
            })
        ));
        assert!(Kmeans::new(2)
            .with_cluster_count_policy(ClusterCountPolicy::Strict)
            .fit(&data)
            .is_ok());
    }

    #[test]
    fn iteration_limit_is_reported() {
        let data: Vec<Record<u32>> = (0..40)
            .map(|i| {
                let x = i as f64;
                Record::new(i, x, (x * 0.7).sin() * 1_000.0, (x * 1.3).cos() * 50.0)
            })
            .collect();
        let fit = Kmeans::new(6).with_max_iter(1).with_tol(0.0).fit(&data).unwrap();
        assert_eq!(fit.status, FitStatus::IterationLimitReached { iterations: 1 });
        assert!(!fit.converged());
        assert_eq!(fit.iterations(), 1);
        assert_eq!(fit.labels.len(), 40);
        assert!(fit.assignments.iter().all(|&l| l < 6));
    }

    #[test]
    fn labels_match_returned_centroids() {
        let data = two_groups();
        let fit = Kmeans::new(2).with_max_iter(1).fit(&data).unwrap();
        let normalized = fit.stats.unwrap().transform_all(&data);
        for (p, &label) in normalized.iter().zip(&fit.assignments) {
            assert_eq!(lloyd::nearest(p, &fit.centroids).0, label);
        }
    }

    #[test]
    fn same_seed_same_result() {
        let data = two_groups();
        let a = Kmeans::new(3).with_seed(9).fit(&data).unwrap();
        let b = Kmeans::new(3).with_seed(9).fit(&data).unwrap();
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.status, b.status);
    }

    #[test]
    fn predict_uses_fitted_statistics() {
        let data = two_groups();
        let fit = Kmeans::new(2).fit(&data).unwrap();
        let young = fit.labels[&1];
        let old = fit.labels[&4];
        let new = vec![
            Record::new("x", 23.0, 32_000.0, 1_020.0),
            Record::new("y", 62.0, 119_000.0, 5_050.0),
        ];
        assert_eq!(fit.predict(&new).unwrap(), vec![young, old]);
    }

    #[test]
    fn cancellation_is_checked_before_iterating() {
        let data = two_groups();
        let cancel = AtomicBool::new(true);
        let err = Kmeans::new(2).fit_with_cancel(&data, &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled { iterations: 0 }));

        cancel.store(false, Ordering::Relaxed);
        assert!(Kmeans::new(2).fit_with_cancel(&data, &cancel).is_ok());
    }

    #[test]
    fn fit_predict_is_index_aligned() {
        let data = two_groups();
        let model = Kmeans::new(2);
        let labels = model.fit_predict(&data).unwrap();
        assert_eq!(labels.len(), data.len());
        assert_eq!(model.n_clusters(), 2);
        assert_eq!(labels, model.fit(&data).unwrap().assignments);
    }
}

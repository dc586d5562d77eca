//! Segmentation run configuration.
//!
//! The engine itself is configured through the [`Kmeans`] builder. This struct
//! is the serializable form a host application loads from its own settings;
//! every field is optional and falls back to the defaults below.
//!
//! | field                   | default   |
//! |-------------------------|-----------|
//! | `k`                     | `5`       |
//! | `max_iterations`        | `300`     |
//! | `convergence_threshold` | `0.0001`  |
//! | `seed`                  | `42`      |
//! | `cluster_count_policy`  | `lenient` |

use serde::{Deserialize, Serialize};

use crate::cluster::{
    ClusterCountPolicy, Kmeans, DEFAULT_K, DEFAULT_MAX_ITER, DEFAULT_SEED, DEFAULT_TOL,
};
use crate::error::Result;

/// Settings for one segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Number of segments.
    pub k: usize,
    /// Iteration cap for the Lloyd loop.
    pub max_iterations: usize,
    /// Maximum per-centroid movement for convergence.
    pub convergence_threshold: f64,
    /// Seed for k-means++ seeding.
    pub seed: u64,
    /// Handling of `k` above the number of distinct customers.
    pub cluster_count_policy: ClusterCountPolicy,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_iterations: DEFAULT_MAX_ITER,
            convergence_threshold: DEFAULT_TOL,
            seed: DEFAULT_SEED,
            cluster_count_policy: ClusterCountPolicy::default(),
        }
    }
}

impl SegmentationConfig {
    /// Build the clusterer described by this configuration, without validating it.
    pub fn kmeans(&self) -> Kmeans {
        Kmeans::new(self.k)
            .with_max_iter(self.max_iterations)
            .with_tol(self.convergence_threshold)
            .with_seed(self.seed)
            .with_cluster_count_policy(self.cluster_count_policy)
    }

    /// Check every field.
    pub fn validate(&self) -> Result<()> {
        self.kmeans().validate()
    }

    /// Validate and build the clusterer.
    pub fn build(&self) -> Result<Kmeans> {
        let kmeans = self.kmeans();
        kmeans.validate()?;
        Ok(kmeans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults() {
        let cfg = SegmentationConfig::default();
        assert_eq!(cfg.k, 5);
        assert_eq!(cfg.max_iterations, 300);
        assert_eq!(cfg.convergence_threshold, 0.0001);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.cluster_count_policy, ClusterCountPolicy::Lenient);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SegmentationConfig =
            serde_json::from_str(r#"{ "k": 3, "cluster_count_policy": "strict" }"#).unwrap();
        assert_eq!(cfg.k, 3);
        assert_eq!(cfg.max_iterations, DEFAULT_MAX_ITER);
        assert_eq!(cfg.cluster_count_policy, ClusterCountPolicy::Strict);

        let model = cfg.build().unwrap();
        assert_eq!(model.max_iter(), DEFAULT_MAX_ITER);
        assert_eq!(model.seed(), DEFAULT_SEED);
        assert_eq!(model.cluster_count_policy(), ClusterCountPolicy::Strict);
    }

    #[test]
    fn invalid_values_fail_build() {
        let cfg = SegmentationConfig {
            k: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.build(),
            Err(Error::InvalidConfiguration { name: "k", .. })
        ));

        let cfg = SegmentationConfig {
            convergence_threshold: -0.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = SegmentationConfig {
            k: 4,
            seed: 7,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"cluster_count_policy\":\"lenient\""));
        let back: SegmentationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}

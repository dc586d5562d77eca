//! The clustering engine.
//!
//! ## Pipeline
//!
//! ```text
//! records ──normalize──▶ feature vectors ──k-means++──▶ k centroids
//!                                                        │
//!            ┌──────────── assign ◀──────────────────────┘
//!            ▼
//!         update ──▶ converged? ──no──▶ (next iteration, up to max_iter)
//!                        │ yes / cap reached
//!                        ▼
//!            final nearest-centroid pass ──▶ customer_id → label
//! ```
//!
//! ### Normalization
//!
//! Age, income and purchase amount live on wildly different scales, so each
//! is standardized to zero mean and unit population variance before any
//! distance is taken. See [`normalize`].
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, then move each centroid to the
//! mean of its points. Repeat until no centroid moves more than the threshold.
//!
//! **Objective**: minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! A cluster that ends an assignment step empty keeps its previous centroid.
//!
//! ## Usage
//!
//! ```rust
//! use segmenter::cluster::{Clustering, Kmeans};
//! use segmenter::Record;
//!
//! let records = vec![
//!     Record::new(1u32, 20.0, 30_000.0, 1_000.0),
//!     Record::new(2, 21.0, 31_000.0, 1_100.0),
//!     Record::new(3, 60.0, 120_000.0, 5_000.0),
//!     Record::new(4, 61.0, 119_000.0, 5_200.0),
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&records).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod distance;
mod feature;
mod init;
mod kmeans;
mod lloyd;
mod traits;

pub use distance::{distance, squared_distance};
pub use feature::{normalize, Centroid, FeatureStats, FeatureVector, Moments, N_FEATURES};
pub use init::{initialize, initialize_with_rng};
pub use kmeans::{
    ClusterCountPolicy, FitStatus, Kmeans, KmeansFit, LabelMap, DEFAULT_K, DEFAULT_MAX_ITER,
    DEFAULT_SEED, DEFAULT_TOL,
};
pub use lloyd::{assign, has_converged, nearest, nearest_labels, update, Clusters};
pub use traits::Clustering;

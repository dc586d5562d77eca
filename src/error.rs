use thiserror::Error;

/// Errors returned by the segmentation engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Initialization was asked to seed centroids from zero points.
    ///
    /// `Kmeans::fit` never returns this: an empty record set is a valid
    /// degenerate fit.
    #[error("empty input")]
    EmptyInput,

    /// Invalid configuration value.
    #[error("invalid configuration {name}: {message}")]
    InvalidConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count exceeds the distinct points available (strict policy).
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} distinct points")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of distinct points in the dataset.
        n_items: usize,
    },

    /// Two centroid sequences (or clusters and centroids) disagree on `k`.
    #[error("centroid count mismatch: expected {expected}, found {found}")]
    CentroidCountMismatch {
        /// Expected number of centroids.
        expected: usize,
        /// Found number of centroids.
        found: usize,
    },

    /// The fit was cancelled at an iteration boundary.
    #[error("fit cancelled after {iterations} iterations")]
    Cancelled {
        /// Iterations completed before the cancellation was observed.
        iterations: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

use std::hash::Hash;

use crate::error::Result;
use crate::record::Record;

/// Common interface for hard clustering of customer records (one label per record).
pub trait Clustering {
    /// Fit the model and return one cluster label per input record, index-aligned.
    fn fit_predict<I>(&self, records: &[Record<I>]) -> Result<Vec<usize>>
    where
        I: Clone + Eq + Hash;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;
}

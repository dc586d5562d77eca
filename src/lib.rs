//! Customer segmentation.
//!
//! `segmenter` assigns each customer record to one of `k` behavioral segments
//! by clustering three numeric features: age, income and purchase amount.
//!
//! The primary public API is under [`cluster`], which provides:
//! - feature standardization (zero mean, unit population variance)
//! - k-means (k-means++ seeding, Lloyd iterations, explicit seed)
//!
//! Around the engine:
//! - [`config`]: serde-loadable run settings
//! - [`profile`]: per-segment summaries and names over the raw records
//!
//! The engine does no I/O. Loading records and storing labels belong to the
//! caller.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod profile;
pub mod record;

pub use cluster::{
    Centroid, ClusterCountPolicy, Clustering, FeatureStats, FeatureVector, FitStatus, Kmeans,
    KmeansFit, LabelMap,
};
pub use config::SegmentationConfig;
pub use error::{Error, Result};
pub use profile::{summarize, SegmentProfile};
pub use record::Record;

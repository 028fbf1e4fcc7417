//! Data Model Module
//!
//! Input types shared by the compositor and the link materializer:
//! - Image keys, clusters and size-bucketed cluster sets
//! - Cluster size statistics
//! - Decoded image storage

pub mod cluster;
pub mod store;

pub use cluster::{Cluster, ClusterSet, ClusterStats, ImageKey, SizeCount};
pub use store::ImageStore;

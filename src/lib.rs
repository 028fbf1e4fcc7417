//! Clustergrid - Inspection Views for Image Clustering Results
//!
//! Clustergrid takes clusters of similar images and provides two views of
//! them:
//! 1. Grid Composite - every cluster as one column of a single RGB image
//! 2. Link Tree - a directory of symbolic links per cluster for browsing
//!    with a file manager
//!
//! # Architecture
//!
//! - [`model`]: cluster sets bucketed by size, and decoded images
//! - [`compose`]: layout, memory budget check and the pixel compositor
//! - [`links`]: destructive rebuild of the symlink tree
//! - [`io`]: JSON cluster files and image decoding/encoding
//!
//! The two views are independent and share only the input types.

pub mod cli;
pub mod compose;
pub mod error;
pub mod io;
pub mod links;
pub mod model;

pub use compose::{compose, visualize, ComposeOptions, Composite};
pub use error::{ClusterError, Result};
pub use links::{materialize, LinkReport};
pub use model::{Cluster, ClusterSet, ImageKey, ImageStore};

//! Grid layout geometry
//!
//! Computes how many rows and columns the composite needs, checks the
//! memory budget, and decides which cell every cluster member lands in.
//! Nothing here allocates the pixel buffer.

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};
use crate::model::{ClusterSet, ImageKey, ImageStore};

/// Default hard limit for the composite buffer (1 GiB)
pub const DEFAULT_MEMORY_LIMIT_BYTES: u64 = 1 << 30;

/// Color channels per pixel in the composite
pub const CHANNELS: usize = 3;

/// Caller-supplied compositor parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// Only lay out clusters with at most this many members
    pub max_cluster_size: Option<usize>,
    /// Hard limit for the composite buffer in bytes
    pub memory_limit_bytes: u64,
    /// Show at most this many members of each cluster
    pub max_examples_per_cluster: Option<usize>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions {
            max_cluster_size: None,
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT_BYTES,
            max_examples_per_cluster: None,
        }
    }
}

impl ComposeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cluster_size(mut self, size: usize) -> Self {
        self.max_cluster_size = Some(size);
        self
    }

    pub fn with_memory_limit(mut self, bytes: u64) -> Self {
        self.memory_limit_bytes = bytes;
        self
    }

    pub fn with_max_examples(mut self, examples: usize) -> Self {
        self.max_examples_per_cluster = Some(examples);
        self
    }
}

/// Shape of the composite grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGeometry {
    /// One row per shown cluster member
    pub rows: usize,
    /// One column per laid out cluster
    pub columns: usize,
    /// Cell height in pixels
    pub cell_height: u32,
    /// Cell width in pixels
    pub cell_width: u32,
    /// Largest cluster size that gets a column
    pub max_cluster_size: usize,
}

impl LayoutGeometry {
    /// Compute the geometry and enforce the memory budget
    ///
    /// # Errors
    /// * `InvalidInput` - empty `clusters` or `images`, every cluster
    ///   filtered out, or a zero example cap
    /// * `MemoryBudgetExceeded` - the buffer would exceed
    ///   `options.memory_limit_bytes`
    pub fn plan(
        clusters: &ClusterSet,
        images: &ImageStore,
        options: &ComposeOptions,
    ) -> Result<Self> {
        if clusters.is_empty() {
            return Err(ClusterError::invalid_input("`clusters` is empty"));
        }
        if options.max_examples_per_cluster == Some(0) {
            return Err(ClusterError::invalid_input(
                "max_examples_per_cluster must be at least 1",
            ));
        }

        let mut stats = clusters.stats();
        if let Some(cap) = options.max_cluster_size {
            stats.retain_max_size(cap);
        }
        let max_cluster_size = stats.max_size().ok_or_else(|| {
            ClusterError::invalid_input(format!(
                "no clusters with at most {} members",
                options.max_cluster_size.unwrap_or_default()
            ))
        })?;

        let columns = stats.total_clusters();
        let rows = match options.max_examples_per_cluster {
            Some(examples) => examples.min(max_cluster_size),
            None => max_cluster_size,
        };

        let (cell_height, cell_width) = images
            .cell_shape()
            .ok_or_else(|| ClusterError::invalid_input("`images` is empty"))?;

        let geometry = LayoutGeometry {
            rows,
            columns,
            cell_height,
            cell_width,
            max_cluster_size,
        };

        let required_bytes = geometry.required_bytes();
        if required_bytes > options.memory_limit_bytes {
            return Err(ClusterError::MemoryBudgetExceeded {
                required_bytes,
                limit_bytes: options.memory_limit_bytes,
            });
        }

        Ok(geometry)
    }

    /// Bytes needed for the composite, saturating at `u64::MAX`
    pub fn required_bytes(&self) -> u64 {
        [
            self.rows as u64,
            self.cell_height as u64,
            self.columns as u64,
            self.cell_width as u64,
            CHANNELS as u64,
        ]
        .into_iter()
        .fold(1u64, u64::saturating_mul)
    }

    /// `(height, width, channels)` of the composite
    pub fn buffer_shape(&self) -> (usize, usize, usize) {
        (
            self.rows * self.cell_height as usize,
            self.columns * self.cell_width as usize,
            CHANNELS,
        )
    }

    /// Composite `(width, height)` in pixels as the image crate wants them
    pub fn pixel_dimensions(&self) -> Result<(u32, u32)> {
        let (height, width, _) = self.buffer_shape();
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(ClusterError::invalid_input(format!(
                "composite of {}x{} pixels is too large",
                width, height
            ))),
        }
    }

    /// Top-left pixel `(x, y)` of a cell
    pub fn cell_origin(&self, row: usize, column: usize) -> (usize, usize) {
        (
            column * self.cell_width as usize,
            row * self.cell_height as usize,
        )
    }
}

/// One member assigned to one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement<'a> {
    pub row: usize,
    pub column: usize,
    pub key: &'a ImageKey,
}

/// Assign cells to cluster members
///
/// Buckets are visited in ascending size and clusters in stored order, each
/// taking the next column. Members fill rows top to bottom; members past
/// `geometry.rows` are skipped.
pub fn placements<'a>(clusters: &'a ClusterSet, geometry: &LayoutGeometry) -> Vec<CellPlacement<'a>> {
    let mut cells = Vec::new();
    let groups = clusters
        .buckets()
        .take_while(|(size, _)| *size <= geometry.max_cluster_size)
        .flat_map(|(_, group)| group.iter());

    for (column, cluster) in groups.enumerate() {
        for (row, key) in cluster.iter().take(geometry.rows).enumerate() {
            cells.push(CellPlacement { row, column, key });
        }
    }
    cells
}

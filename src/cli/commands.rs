//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use log::info;

use crate::compose::{visualize, ComposeOptions, PngSink};
use crate::error::{ClusterError, Result};
use crate::io::{load_clusters, load_images_for, read_images};
use crate::links::materialize;

/// Build compositor options from an optional JSON file plus flag overrides.
pub fn resolve_options(
    config: Option<&Path>,
    max_cluster_size: Option<usize>,
    memory_limit: Option<u64>,
    examples: Option<usize>,
) -> Result<ComposeOptions> {
    let mut options = match config {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| ClusterError::FileReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            serde_json::from_str(&content)?
        }
        None => ComposeOptions::default(),
    };

    if max_cluster_size.is_some() {
        options.max_cluster_size = max_cluster_size;
    }
    if let Some(bytes) = memory_limit {
        options.memory_limit_bytes = bytes;
    }
    if examples.is_some() {
        options.max_examples_per_cluster = examples;
    }

    Ok(options)
}

/// Compose the clusters in `clusters_path` and write the grid to `output`.
pub fn plot(
    clusters_path: &Path,
    output: &Path,
    images_dir: Option<&Path>,
    options: &ComposeOptions,
) -> Result<()> {
    info!("Plotting clusters from: {}", clusters_path.display());

    let clusters = load_clusters(clusters_path)?;
    let images = match images_dir {
        Some(dir) => read_images(dir)?,
        None => load_images_for(&clusters)?,
    };

    let mut sink = PngSink::new(output);
    visualize(&clusters, &images, options, &mut sink)?;

    println!("Composite written: {}", output.display());
    Ok(())
}

/// Rebuild the symlink tree for the clusters in `clusters_path`.
pub fn links(clusters_path: &Path, target: &Path) -> Result<()> {
    info!("Linking clusters from: {}", clusters_path.display());

    let clusters = load_clusters(clusters_path)?;
    let report = materialize(&clusters, target)?;

    println!(
        "Created {} links in {} cluster directories under {}",
        report.links,
        report.directories,
        target.display()
    );
    Ok(())
}

/// Print cluster counts per cluster size.
pub fn stats(clusters_path: &Path) -> Result<()> {
    let clusters = load_clusters(clusters_path)?;
    let stats = clusters.stats();

    println!("{:>12} {:>12}", "size", "clusters");
    println!("{:-<25}", "");
    for entry in stats.entries() {
        println!("{:>12} {:>12}", entry.size, entry.count);
    }
    println!("{:-<25}", "");
    println!("{:>12} {:>12}", "total", stats.total_clusters());

    Ok(())
}

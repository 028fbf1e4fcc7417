//! CLI Module
//!
//! Command-line interface for clustergrid.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clustergrid - browse image clustering results
#[derive(Parser, Debug)]
#[command(name = "clustergrid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose all clusters into one grid image
    #[command(name = "plot")]
    Plot {
        /// Cluster file (JSON, clusters keyed by size)
        #[arg(short, long)]
        clusters: PathBuf,

        /// Output image file
        #[arg(short, long)]
        output: PathBuf,

        /// Directory to read images from (default: load cluster members directly)
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// Compositor options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only plot clusters with at most this many images
        #[arg(long)]
        max_cluster_size: Option<usize>,

        /// Hard memory limit for the plot array in bytes
        #[arg(long)]
        memory_limit: Option<u64>,

        /// Show at most this many images per cluster
        #[arg(long)]
        examples: Option<usize>,
    },

    /// Rebuild a directory of symlinks mirroring the clusters
    #[command(name = "links")]
    Links {
        /// Cluster file (JSON, clusters keyed by size)
        #[arg(short, long)]
        clusters: PathBuf,

        /// Target directory (deleted and recreated)
        #[arg(short, long)]
        target: PathBuf,
    },

    /// Print the number of clusters per cluster size
    #[command(name = "stats")]
    Stats {
        /// Cluster file (JSON, clusters keyed by size)
        #[arg(short, long)]
        clusters: PathBuf,
    },
}

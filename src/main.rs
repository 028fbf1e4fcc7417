//! Clustergrid CLI
//!
//! Command-line interface for inspecting image clustering results.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use clustergrid::cli::commands;
use clustergrid::cli::{Cli, Commands};
use clustergrid::ClusterError;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Clustergrid v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = handle_command(cli.command) {
        eprintln!("Error: {:#}", err);
        if let Some(cluster_err) = err.downcast_ref::<ClusterError>() {
            eprintln!("Code: {}", cluster_err.error_code());
            for suggestion in cluster_err.recovery_suggestions() {
                eprintln!("  - {}", suggestion);
            }
        }
        std::process::exit(1);
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Plot {
            clusters,
            output,
            images,
            config,
            max_cluster_size,
            memory_limit,
            examples,
        } => {
            let options = commands::resolve_options(
                config.as_deref(),
                max_cluster_size,
                memory_limit,
                examples,
            )
            .context("failed to resolve compositor options")?;
            commands::plot(&clusters, &output, images.as_deref(), &options)
                .with_context(|| format!("failed to plot {}", clusters.display()))
        }
        Commands::Links { clusters, target } => commands::links(&clusters, &target)
            .with_context(|| format!("failed to link clusters into {}", target.display())),
        Commands::Stats { clusters } => commands::stats(&clusters)
            .with_context(|| format!("failed to read {}", clusters.display())),
    }
}

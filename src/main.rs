//! Hierarchy command-line tool.

use anyhow::{Context, Result};
use clap::Parser;
use hierarchy::cli::Cli;
use hierarchy::logging;
use hierarchy::{BuildInfo, merge_files_in_hierarchy, process_hierarchy};
use tracing::{debug, error};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let build = BuildInfo::current();

    if cli.version {
        println!("{build}");
        return Ok(());
    }

    let level = logging::level_for(cli.debug, cli.trace);
    logging::init(&cli.log, level)?;
    build.log();

    let config = cli.into_config()?;
    debug!(
        hierarchy = %config.hierarchy_file.display(),
        base = %config.base_path.display(),
        output = %config.output_file.display(),
        filter = %config.filter_extension,
        fail_missing = config.fail_missing,
        "Starting merge"
    );

    if let Err(e) = run(&config) {
        error!(error = %e, "Merge failed");
        return Err(e);
    }
    Ok(())
}

fn run(config: &hierarchy::Config) -> Result<()> {
    let directories = process_hierarchy(config)
        .with_context(|| format!("resolving hierarchy {}", config.hierarchy_file.display()))?;
    merge_files_in_hierarchy(&directories, &config.filter_extension, &config.output_file)
        .context("merging configuration fragments")?;
    Ok(())
}

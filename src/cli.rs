//! Command-line definitions.
//!
//! `Cli` holds the raw flags; [`Cli::into_config`] turns them into the
//! [`Config`] consumed by the merge pipeline.

use crate::config::{Config, ExtensionFilter};
use crate::error::Result;
use crate::logging::LogTarget;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Merge JSON and YAML fragments along a directory hierarchy
#[derive(Parser, Debug)]
#[command(about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Hierarchy file listing one directory per line
    #[arg(short = 'f', long = "file", default_value = "hierarchy.lst")]
    pub hierarchy_file: PathBuf,

    /// Base path for relative entries (default: directory of the hierarchy file)
    #[arg(short, long = "base")]
    pub base_path: Option<PathBuf>,

    /// Output file for the merged YAML document
    #[arg(short, long = "output", default_value = "output.yaml")]
    pub output_file: PathBuf,

    /// Comma separated list of accepted file extensions
    #[arg(long, default_value = "json,yml,yaml")]
    pub filter: String,

    /// Fail if a directory listed in the hierarchy does not exist
    #[arg(long = "failmissing")]
    pub fail_missing: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace logging
    #[arg(short, long)]
    pub trace: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: LogTarget,

    /// Print version information and exit
    #[arg(short = 'V', long)]
    pub version: bool,
}

impl Cli {
    /// Build the run configuration from parsed flags.
    pub fn into_config(self) -> Result<Config> {
        let filter: ExtensionFilter = self.filter.parse()?;
        let base_path = self
            .base_path
            .unwrap_or_else(|| default_base_path(&self.hierarchy_file));
        Ok(Config {
            hierarchy_file: self.hierarchy_file,
            base_path,
            output_file: self.output_file,
            filter_extension: filter,
            fail_missing: self.fail_missing,
            log_debug: self.debug,
            log_trace: self.trace,
        })
    }
}

/// Directory containing the hierarchy file, or `.` if it has none.
fn default_base_path(hierarchy_file: &Path) -> PathBuf {
    match hierarchy_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

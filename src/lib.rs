//! Configuration hierarchy merger.
//!
//! Reads a hierarchy file listing directories from most general to most
//! specific, collects the JSON and YAML fragments in each, and deep-merges
//! them in order into a single YAML document.
//!
//! ```no_run
//! use hierarchy::{Config, merge_files_in_hierarchy, process_hierarchy};
//!
//! let config = Config::new("conf/hierarchy.lst", "conf", "output.yaml");
//! let directories = process_hierarchy(&config)?;
//! merge_files_in_hierarchy(&directories, &config.filter_extension, &config.output_file)?;
//! # Ok::<(), hierarchy::HierarchyError>(())
//! ```

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod files;
pub mod hierarchy;
pub mod logging;
pub mod merge;
pub mod version;

pub use config::{Config, ExtensionFilter};
pub use error::{HierarchyError, Result};
pub use files::list_files;
pub use hierarchy::{process_hierarchy, resolve_hierarchy};
pub use merge::{deep_merge, merge_files_in_hierarchy, merge_hierarchy};
pub use version::BuildInfo;

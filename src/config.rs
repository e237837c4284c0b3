//! Resolved run options.
//!
//! `Config` is built once (normally by the CLI) and handed by reference to
//! the resolver and merger. Nothing mutates it afterwards.

use crate::error::{HierarchyError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extensions accepted when no filter is given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["json", "yml", "yaml"];

/// Suffix marking a fragment as switched off.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Case-insensitive set of accepted file extensions.
///
/// Extensions are stored lowercase without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Build a filter from a list of extensions, with or without leading dots.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        let mut raw = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref();
            raw.push(ext.to_string());
            let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            if !normalized.is_empty() {
                set.insert(normalized);
            }
        }
        if set.is_empty() {
            return Err(HierarchyError::InvalidFilter(raw.join(",")));
        }
        Ok(Self { extensions: set })
    }

    /// Check an extension (no leading dot) against the filter.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.contains(&ext.to_ascii_lowercase())
    }

    /// Check a file name: its extension must be accepted and it must not
    /// carry the disabled suffix.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.to_ascii_lowercase().ends_with(DISABLED_SUFFIX) {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.accepts_extension(ext))
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl FromStr for ExtensionFilter {
    type Err = HierarchyError;

    /// Parse a comma separated list such as `json,.YML, yaml`.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(HierarchyError::InvalidFilter(s.to_string()));
        }
        Self::new(s.split(','))
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<&str> = self.extensions().collect();
        write!(f, "{}", list.join(","))
    }
}

/// Options for one merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hierarchy file listing the directories to merge.
    pub hierarchy_file: PathBuf,
    /// Root for relative entries in the hierarchy file.
    pub base_path: PathBuf,
    /// Where the merged YAML document is written.
    pub output_file: PathBuf,
    pub filter_extension: ExtensionFilter,
    /// Treat a missing directory as fatal instead of skipping it.
    pub fail_missing: bool,
    pub log_debug: bool,
    pub log_trace: bool,
}

impl Config {
    /// Create a config with default filter and quiet logging.
    pub fn new(
        hierarchy_file: impl Into<PathBuf>,
        base_path: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hierarchy_file: hierarchy_file.into(),
            base_path: base_path.into(),
            output_file: output_file.into(),
            filter_extension: ExtensionFilter::default(),
            fail_missing: false,
            log_debug: false,
            log_trace: false,
        }
    }

    pub fn with_fail_missing(mut self, fail_missing: bool) -> Self {
        self.fail_missing = fail_missing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = ExtensionFilter::default();
        assert!(filter.accepts(Path::new("defaults.json")));
        assert!(filter.accepts(Path::new("defaults.yml")));
        assert!(filter.accepts(Path::new("one.YAML")));
        assert!(!filter.accepts(Path::new("fail.txt")));
        assert!(!filter.accepts(Path::new("fail.yaml.disabled")));
        assert!(!filter.accepts(Path::new(".gitkeep")));
        assert!(!filter.accepts(Path::new("README")));
    }

    #[test]
    fn test_parse_filter_list() {
        let filter: ExtensionFilter = "json, .YML,,".parse().unwrap();
        assert_eq!(filter.to_string(), "json,yml");
        assert!(filter.accepts(Path::new("a.Yml")));
        assert!(!filter.accepts(Path::new("a.yaml")));
    }

    #[test]
    fn test_empty_filter_rejected() {
        assert!(matches!(
            "".parse::<ExtensionFilter>(),
            Err(HierarchyError::InvalidFilter(_))
        ));
        assert!(matches!(
            " , .".parse::<ExtensionFilter>(),
            Err(HierarchyError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_disabled_suffix_wins_over_filter() {
        let filter = ExtensionFilter::new(["yaml", "disabled"]).unwrap();
        assert!(!filter.accepts(Path::new("fail.yaml.disabled")));
        assert!(!filter.accepts(Path::new("x.DISABLED")));
    }
}

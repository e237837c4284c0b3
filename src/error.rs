//! Error types for hierarchy resolution and fragment merging.

use std::path::PathBuf;
use thiserror::Error;

/// Every fatal condition the merge pipeline can hit.
///
/// None of these are retried. The binary surfaces them through `anyhow` and
/// exits with a non-zero status.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HierarchyError {
    #[error("failed to read hierarchy file {path}: {source}")]
    ReadHierarchy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: environment variable {name} is not set")]
    UnsetVariable {
        path: PathBuf,
        line: usize,
        name: String,
    },

    #[error("directory {path} does not exist")]
    MissingDirectory { path: PathBuf },

    #[error("failed to list directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFragment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no parser for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to render merged document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("extension filter {0:?} accepts no extensions")]
    InvalidFilter(String),
}

impl HierarchyError {
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }
}

/// Result type for the merge pipeline.
pub type Result<T> = std::result::Result<T, HierarchyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variable_message_names_line() {
        let err = HierarchyError::UnsetVariable {
            path: PathBuf::from("conf/hierarchy.lst"),
            line: 3,
            name: "JSON".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "conf/hierarchy.lst:3: environment variable JSON is not set"
        );
    }

    #[test]
    fn test_parse_error_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HierarchyError::ParseJson {
            path: PathBuf::from("a.json"),
            source,
        };
        assert!(err.to_string().starts_with("failed to parse JSON in a.json"));
    }
}

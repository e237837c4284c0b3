//! Fragment discovery inside a single hierarchy directory.

use crate::config::ExtensionFilter;
use crate::error::{HierarchyError, Result};
use std::path::{Path, PathBuf};
use tracing::trace;

/// List the fragment files directly inside `directory`.
///
/// Only regular files accepted by `filter` are returned, sorted by file name.
/// Sub-directories are not descended into.
pub fn list_files(directory: &Path, filter: &ExtensionFilter) -> Result<Vec<PathBuf>> {
    let read_error = |source| HierarchyError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        // Follows symlinks, so a link to a fragment counts as a file.
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !filter.accepts(&path) {
            trace!(file = %path.display(), "Ignoring file outside extension filter");
            continue;
        }
        names.push(entry.file_name());
    }

    names.sort();
    Ok(names.into_iter().map(|name| directory.join(name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        for name in [
            "zeta.yaml",
            "defaults.yml",
            "defaults.json",
            "fail.txt",
            "fail.yaml.disabled",
            "Upper.JSON",
        ] {
            fs::write(dir.join(name), "{}").unwrap();
        }

        let files = list_files(dir, &ExtensionFilter::default()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.join("Upper.JSON"),
                dir.join("defaults.json"),
                dir.join("defaults.yml"),
                dir.join("zeta.yaml"),
            ]
        );
    }

    #[test]
    fn test_list_files_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested.yaml");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("inner.yaml"), "a: 1\n").unwrap();
        fs::write(temp.path().join("top.yaml"), "a: 2\n").unwrap();

        let files = list_files(temp.path(), &ExtensionFilter::default()).unwrap();
        assert_eq!(files, vec![temp.path().join("top.yaml")]);
    }

    #[test]
    fn test_list_files_custom_filter() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.json"), "{}").unwrap();
        fs::write(temp.path().join("b.yaml"), "{}").unwrap();

        let filter: ExtensionFilter = "yaml".parse().unwrap();
        let files = list_files(temp.path(), &filter).unwrap();
        assert_eq!(files, vec![temp.path().join("b.yaml")]);
    }

    #[test]
    fn test_list_files_empty_directory() {
        let temp = TempDir::new().unwrap();
        let files = list_files(temp.path(), &ExtensionFilter::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_files_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let err = list_files(&temp.path().join("gone"), &ExtensionFilter::default()).unwrap_err();
        assert!(matches!(err, HierarchyError::ReadDirectory { .. }));
    }
}

//! Hierarchy file resolution.
//!
//! A hierarchy file lists one directory per line, most general first. Lines
//! starting with `#` and blank lines are ignored. Entries may reference
//! environment variables as `${NAME}` or `$NAME` and are resolved against
//! the base path unless absolute.

use crate::config::Config;
use crate::env::{Environment, ProcessEnvironment, expand};
use crate::error::{HierarchyError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};

/// Comment marker for hierarchy lines.
pub const COMMENT_PREFIX: char = '#';

/// Resolve the hierarchy named by `config` against the process environment.
pub fn process_hierarchy(config: &Config) -> Result<Vec<PathBuf>> {
    resolve_hierarchy(
        &config.hierarchy_file,
        &config.base_path,
        config.fail_missing,
        &ProcessEnvironment,
    )
}

/// Read `hierarchy_file` and return its directories in file order.
///
/// An unset variable is always fatal. A missing directory is fatal only when
/// `fail_missing` is set and is skipped otherwise. Duplicates are kept.
pub fn resolve_hierarchy(
    hierarchy_file: &Path,
    base_path: &Path,
    fail_missing: bool,
    env: &impl Environment,
) -> Result<Vec<PathBuf>> {
    let content =
        std::fs::read_to_string(hierarchy_file).map_err(|source| HierarchyError::ReadHierarchy {
            path: hierarchy_file.to_path_buf(),
            source,
        })?;

    let mut directories = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let expanded = expand(line, env).map_err(|name| HierarchyError::UnsetVariable {
            path: hierarchy_file.to_path_buf(),
            line: index + 1,
            name,
        })?;
        trace!(line = index + 1, entry = %line, expanded = %expanded, "Expanded hierarchy entry");

        let directory = resolve_entry(base_path, &expanded);
        if !env.is_dir(&directory) {
            if fail_missing {
                return Err(HierarchyError::missing_directory(directory));
            }
            warn!(directory = %directory.display(), "Skipping missing directory");
            continue;
        }

        debug!(directory = %directory.display(), "Adding directory to hierarchy");
        directories.push(directory);
    }

    Ok(directories)
}

/// Join `entry` onto `base_path` (unless absolute) and normalize it.
pub fn resolve_entry(base_path: &Path, entry: &str) -> PathBuf {
    let path = Path::new(entry);
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base_path.join(path))
    }
}

/// Lexically resolve `.` and `..` components.
///
/// No filesystem access. A `..` that cannot pop a normal component is kept,
/// so `../x` relative to nothing stays `../x`. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(Component::ParentDir),
            },
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

//! Deep merge of configuration fragments.
//!
//! Fragments are merged field by field: mappings are combined recursively and
//! every other value (scalars, sequences, null) is replaced by the later
//! fragment. Sequences are replaced entirely, not concatenated.
//!
//! The document tree is `serde_yaml::Value`, so mapping keys keep their YAML
//! type (`404:` stays an integer key) and JSON fragments load into the same
//! tree.

use crate::config::ExtensionFilter;
use crate::error::{HierarchyError, Result};
use crate::files::list_files;
use serde_yaml::{Mapping, Value};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// - Mappings are merged recursively: keys only in `base` are kept, keys in
///   `overlay` are added or merged
/// - Sequences, strings, numbers, booleans and nulls in `overlay` replace
///   whatever `base` holds at that key
///
/// # Example
/// ```
/// use hierarchy::merge::deep_merge;
/// use serde_yaml::Value;
///
/// let base: Value = serde_yaml::from_str("server: {port: 8080, host: localhost}\nfeatures: [a, b]").unwrap();
/// let overlay: Value = serde_yaml::from_str("server: {port: 9000}\nfeatures: [c]").unwrap();
/// let expected: Value =
///     serde_yaml::from_str("server: {port: 9000, host: localhost}\nfeatures: [c]").unwrap();
/// assert_eq!(deep_merge(base, overlay), expected);
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            merge_into(&mut base_map, overlay_map);
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge `overlay` into `base` in place.
fn merge_into(base: &mut Mapping, overlay: Mapping) {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => {
                let base_value = std::mem::take(slot);
                *slot = deep_merge(base_value, overlay_value);
            }
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Merge values in order, later values taking precedence.
///
/// Starts from an empty mapping, so an empty input yields `{}`.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values
        .into_iter()
        .fold(Value::Mapping(Mapping::new()), deep_merge)
}

/// Parse a fragment according to its extension.
///
/// YAML merge keys (`<<: *anchor`) are applied and custom tags are dropped,
/// keeping the tagged value. Returns `None` for a blank file or a document
/// that is just null: such a fragment contributes nothing rather than wiping
/// the accumulated result.
pub fn load_fragment(path: &Path) -> Result<Option<Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| HierarchyError::ReadFragment {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(None);
    }

    let yaml_error = |source| HierarchyError::ParseYaml {
        path: path.to_path_buf(),
        source,
    };
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let value: Value = match ext.as_deref() {
        Some("json") => {
            serde_json::from_str(&content).map_err(|source| HierarchyError::ParseJson {
                path: path.to_path_buf(),
                source,
            })?
        }
        Some("yml") | Some("yaml") => {
            let parsed: Value = serde_yaml::from_str(&content).map_err(yaml_error)?;
            let mut value = strip_tags(parsed);
            value.apply_merge().map_err(yaml_error)?;
            value
        }
        _ => {
            return Err(HierarchyError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    Ok((!value.is_null()).then_some(value))
}

/// Replace every `!tag value` with its plain value.
fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(strip_tags).collect()),
        other => other,
    }
}

/// Merge every fragment found in `directories`, in order.
///
/// Directories are visited in the given order and files in name order. The
/// first unreadable or malformed fragment aborts the merge.
pub fn merge_hierarchy(directories: &[PathBuf], filter: &ExtensionFilter) -> Result<Value> {
    let mut fragments = Vec::new();
    for directory in directories {
        for file in list_files(directory, filter)? {
            match load_fragment(&file)? {
                Some(fragment) => {
                    debug!(file = %file.display(), "Loaded fragment");
                    fragments.push(fragment);
                }
                None => debug!(file = %file.display(), "Skipping empty fragment"),
            }
        }
    }
    Ok(deep_merge_all(fragments))
}

/// Rank of a key's type when ordering keys of different types.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Sequence(_) => 4,
        Value::Mapping(_) => 5,
        Value::Tagged(_) => 6,
    }
}

fn key_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)).then_with(|| {
            let x = serde_yaml::to_string(a).unwrap_or_default();
            let y = serde_yaml::to_string(b).unwrap_or_default();
            x.cmp(&y)
        }),
    }
}

/// Recursively order mapping keys so output does not depend on the order
/// fragments introduced them.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut entries: Vec<(Value, Value)> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            entries.sort_by(|a, b| key_order(&a.0, &b.0));
            Value::Mapping(entries.into_iter().collect())
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Render `document` as YAML and write it to `output_file`.
///
/// The file is created or truncated. Mapping keys come out sorted.
pub fn write_document(document: &Value, output_file: &Path) -> Result<()> {
    let rendered =
        serde_yaml::to_string(&sort_keys(document.clone())).map_err(HierarchyError::Serialize)?;
    std::fs::write(output_file, rendered).map_err(|source| HierarchyError::WriteOutput {
        path: output_file.to_path_buf(),
        source,
    })
}

/// Merge all fragments under `directories` and write the result.
///
/// Nothing is written if any fragment fails to load.
pub fn merge_files_in_hierarchy(
    directories: &[PathBuf],
    filter: &ExtensionFilter,
    output_file: &Path,
) -> Result<()> {
    let merged = merge_hierarchy(directories, filter)?;
    write_document(&merged, output_file)?;
    info!(
        output = %output_file.display(),
        directories = directories.len(),
        "Wrote merged configuration"
    );
    Ok(())
}

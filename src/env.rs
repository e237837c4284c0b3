//! Environment lookups used while resolving hierarchy entries.
//!
//! The resolver only ever asks two questions of the outside world: what a
//! variable is set to, and whether a path is a directory. Both go through
//! [`Environment`] so tests can pin variables without touching the process
//! environment.

use regex_lite::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Matches `${NAME}` and `$NAME`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("placeholder pattern is valid")
});

/// View of variables and directories seen by the resolver.
pub trait Environment {
    /// Value of `name`, or `None` when unset.
    fn var(&self, name: &str) -> Option<String>;

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables over the real filesystem.
#[derive(Debug, Default, Clone)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Substitute every placeholder in `input`.
///
/// Returns `Err(name)` with the first variable that is not set. A variable
/// set to the empty string substitutes as empty.
pub fn expand(input: &str, env: &impl Environment) -> std::result::Result<String, String> {
    let mut missing = None;
    let expanded = PLACEHOLDER.replace_all(input, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match env.var(name) {
            Some(value) => value,
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });
    match missing {
        Some(name) => Err(name),
        None => Ok(expanded.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braced_and_bare() {
        let env = MapEnvironment::new()
            .with_var("JSON", "json")
            .with_var("ROOT", "/etc/app");
        assert_eq!(expand("../${JSON}", &env).unwrap(), "../json");
        assert_eq!(expand("$ROOT/${JSON}/x", &env).unwrap(), "/etc/app/json/x");
    }

    #[test]
    fn test_expand_without_placeholders() {
        let env = MapEnvironment::new();
        assert_eq!(expand("./../yaml", &env).unwrap(), "./../yaml");
    }

    #[test]
    fn test_expand_reports_first_unset() {
        let env: MapEnvironment = [("A", "a")].into_iter().collect();
        assert_eq!(expand("${A}/${B}/${C}", &env), Err("B".to_string()));
    }

    #[test]
    fn test_empty_value_counts_as_set() {
        let env = MapEnvironment::new().with_var("EMPTY", "");
        assert_eq!(expand("dir${EMPTY}", &env).unwrap(), "dir");
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        let env = MapEnvironment::new();
        assert_eq!(expand("price$/1", &env).unwrap(), "price$/1");
    }
}

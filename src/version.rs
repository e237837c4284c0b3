//! Build information.

use std::fmt;
use tracing::info;

const UNKNOWN: &str = "unknown";

/// Version details fixed at compile time.
///
/// Branch, revision and build date come from the `HIERARCHY_BRANCH`,
/// `HIERARCHY_REVISION` and `HIERARCHY_BUILD_DATE` variables when set during
/// the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub revision: &'static str,
    pub build_date: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: concat!("v", env!("CARGO_PKG_VERSION")),
            branch: option_env!("HIERARCHY_BRANCH").unwrap_or(UNKNOWN),
            revision: option_env!("HIERARCHY_REVISION").unwrap_or(UNKNOWN),
            build_date: option_env!("HIERARCHY_BUILD_DATE").unwrap_or(UNKNOWN),
        }
    }

    /// Emit the build details as one structured log event.
    pub fn log(&self) {
        info!(
            version = self.version,
            branch = self.branch,
            revision = self.revision,
            build_date = self.build_date,
            "Hierarchy"
        );
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hierarchy, version {} (branch: {}, revision: {}), build date: {}",
            self.version, self.branch, self.revision, self.build_date
        )
    }
}

//! Run configuration and process-wide constants.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Platform tags a binary may declare. Fixed for the life of the process.
pub const SUPPORTED_PLATFORMS: &[&str] = &[
    "linux32",
    "linux64",
    "linux-arm64",
    "osx",
    "osx-arm64",
    "win32",
    "win64",
];

/// Catalog path used when none is given.
pub const DEFAULT_CATALOG_PATH: &str = "repo-index.yml";

/// Enables checksum verification when set to exactly `true`.
pub const BINARY_VALIDATION_VAR: &str = "BINARY_VALIDATION";

/// Number of concurrent checksum downloads.
pub const JOBS_VAR: &str = "PLUGINDEX_JOBS";

/// Per-fetch timeout in seconds.
pub const TIMEOUT_VAR: &str = "PLUGINDEX_TIMEOUT_SECS";

/// Default per-fetch timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the catalog file.
    pub catalog_path: PathBuf,
    /// Download every binary and compare it against its checksum.
    pub binary_validation: bool,
    /// Checksum workers; `1` verifies binaries one at a time.
    pub jobs: usize,
    /// Timeout applied to each binary download.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            binary_validation: false,
            jobs: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Build a configuration from process environment variables.
    ///
    /// Reads `BINARY_VALIDATION`, `PLUGINDEX_JOBS` and
    /// `PLUGINDEX_TIMEOUT_SECS`. Unset or unparseable values fall back to
    /// the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let binary_validation = lookup(BINARY_VALIDATION_VAR).is_some_and(|v| v == "true");
        let jobs = lookup(JOBS_VAR)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.jobs);
        let timeout = lookup(TIMEOUT_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&s| s > 0)
            .map_or(defaults.timeout, Duration::from_secs);
        Self {
            binary_validation,
            jobs,
            timeout,
            ..defaults
        }
    }
}

/// Returns `true` if `platform` is one of [`SUPPORTED_PLATFORMS`].
#[must_use]
pub fn is_supported_platform(platform: &str) -> bool {
    SUPPORTED_PLATFORMS.contains(&platform)
}

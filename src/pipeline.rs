//! Whole-catalog validation: canonical order, structural rules, and
//! (opt-in) remote checksum verification, aggregated into one [`Report`].
//!
//! Only a catalog that fails to parse aborts the run. Every other
//! violation is collected and the run keeps going.

use serde::Serialize;
use tracing::{debug, info};

use crate::checksum::{ChecksumVerifier, VerifyError};
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Rule};
use crate::errors::Result;
use crate::models::{Binary, Catalog, Plugin};
use crate::parser::{parse_catalog, read_catalog_bytes};
use crate::pool::run_ordered;
use crate::sorter;
use crate::validator::{self, binary_diag};

/// Whether remote checksums were checked in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChecksumStatus {
    /// Binary validation was not enabled; nothing was downloaded.
    Skipped,
    /// Checksum verification ran over every listed binary.
    Verified { binaries: usize },
}

/// Aggregated result of a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Number of plugins in the catalog.
    pub plugins: usize,
    /// Number of binaries across all plugins.
    pub binaries: usize,
    /// Error diagnostics in a stable order (see [`run`]).
    pub failures: Vec<Diagnostic>,
    /// Quality warnings; these never fail a run.
    pub warnings: Vec<Diagnostic>,
    /// Checksum verification status.
    pub checksums: ChecksumStatus,
}

/// Terminal state of a run.
#[derive(Debug, PartialEq)]
pub enum Outcome<'a> {
    /// No rule was violated; warnings may still be present.
    AllValid,
    /// At least one rule was violated; carries the failures in report order.
    ValidationFailed(&'a [Diagnostic]),
}

impl Report {
    /// Summarize the run as a terminal [`Outcome`].
    #[must_use]
    pub fn outcome(&self) -> Outcome<'_> {
        if self.failures.is_empty() {
            Outcome::AllValid
        } else {
            Outcome::ValidationFailed(&self.failures)
        }
    }

    /// Returns `true` if no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.failures.iter().any(Diagnostic::is_error)
    }
}

/// Validate raw catalog bytes.
///
/// Failures are ordered: the sort check first, then structural rules in
/// catalog order, then checksum results in catalog order regardless of
/// how many workers ran them.
///
/// # Errors
///
/// Returns [`crate::CatalogError::Parse`] when the bytes are not a catalog.
pub fn run(raw: &[u8], config: &Config) -> Result<Report> {
    let catalog = parse_catalog(raw)?;

    let mut failures = Vec::new();
    let mut warnings = Vec::new();

    failures.extend(check_sorted(raw));

    for diag in validator::validate_catalog(&catalog) {
        if diag.is_warning() {
            warnings.push(diag);
        } else {
            failures.push(diag);
        }
    }

    let checksums = if config.binary_validation {
        let (status, diags) = verify_checksums(&catalog, config);
        failures.extend(diags);
        status
    } else {
        debug!("binary validation disabled, skipping checksum downloads");
        ChecksumStatus::Skipped
    };

    Ok(Report {
        plugins: catalog.plugins.len(),
        binaries: catalog.binaries().count(),
        failures,
        warnings,
        checksums,
    })
}

/// Read the configured catalog file and validate it.
pub fn run_file(config: &Config) -> Result<Report> {
    let raw = read_catalog_bytes(&config.catalog_path)?;
    run(&raw, config)
}

fn check_sorted(raw: &[u8]) -> Option<Diagnostic> {
    let message = match sorter::sort(raw) {
        Ok(canonical) if canonical == raw => return None,
        Ok(_) => "catalog is not sorted canonically".to_string(),
        Err(e) => format!("catalog could not be canonicalized: {e}"),
    };
    Some(
        Diagnostic::error(Rule::Unsorted, message)
            .with_suggestion("Run `plugindex sort` and replace the file with its output"),
    )
}

fn verify_checksums(catalog: &Catalog, config: &Config) -> (ChecksumStatus, Vec<Diagnostic>) {
    let pairs: Vec<(&Plugin, &Binary)> = catalog.binaries().collect();
    info!(
        binaries = pairs.len(),
        jobs = config.jobs,
        "verifying binary checksums"
    );

    let verifier = ChecksumVerifier::new(config.timeout);
    let diags = run_ordered(&pairs, config.jobs, |(plugin, binary)| {
        info!(plugin = %plugin.name, platform = %binary.platform, "checking binary");
        verifier
            .verify(&binary.url, &binary.checksum)
            .err()
            .map(|e| verify_diag(plugin, binary, e))
    });

    (
        ChecksumStatus::Verified {
            binaries: pairs.len(),
        },
        diags.into_iter().flatten().collect(),
    )
}

fn verify_diag(plugin: &Plugin, binary: &Binary, error: VerifyError) -> Diagnostic {
    let (rule, message) = match &error {
        VerifyError::Network { .. } => (
            Rule::Network,
            format!(
                "Plugin '{}' binary for platform '{}' could not be fetched: {error}",
                plugin.name, binary.platform
            ),
        ),
        VerifyError::Download { .. } => (
            Rule::Download,
            format!(
                "Failed to retrieve '{}' for platform '{}', can't compute SHA-1: {error}",
                plugin.name, binary.platform
            ),
        ),
        VerifyError::ChecksumMismatch { .. } => (
            Rule::ChecksumMismatch,
            format!(
                "Plugin '{}' has an invalid checksum for platform '{}': {error}",
                plugin.name, binary.platform
            ),
        ),
    };
    binary_diag(rule, message, plugin, binary)
}

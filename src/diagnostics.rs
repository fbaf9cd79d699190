//! Structured diagnostics for catalog validation.
//!
//! Every rule violation is a typed [`Diagnostic`] carrying the violated
//! [`Rule`], a stable code, a severity, and enough location context
//! (plugin, platform, URL) to find the offending entry.

use std::fmt;

use serde::Serialize;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A rule violation that causes validation failure.
    Error,
    /// A quality issue that does not cause failure.
    Warning,
}

/// The rule a diagnostic reports against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// The catalog bytes differ from their canonical form.
    Unsorted,
    /// A plugin version is not a valid semantic version.
    InvalidVersion,
    /// A binary URL does not parse, or its scheme is not `https`.
    InsecureTransport,
    /// A binary URL does not start with `https` or `ftps`.
    InsecureDownloadLink,
    /// A binary platform is not in [`crate::config::SUPPORTED_PLATFORMS`].
    UnknownPlatform,
    /// A plugin name is empty.
    EmptyName,
    /// A plugin name appears more than once.
    DuplicatePlugin,
    /// A plugin declares no binaries.
    MissingBinaries,
    /// A platform appears more than once within one plugin.
    DuplicatePlatform,
    /// A declared checksum is not 40 lowercase hex characters.
    MalformedChecksum,
    /// The binary could not be fetched at the transport level.
    Network,
    /// The binary URL answered with a status outside `[200, 400)`.
    Download,
    /// The downloaded content does not hash to the declared checksum.
    ChecksumMismatch,
}

impl Rule {
    /// Stable code for this rule.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Rule::Unsorted => E001,
            Rule::InvalidVersion => E002,
            Rule::InsecureTransport => E003,
            Rule::InsecureDownloadLink => E004,
            Rule::UnknownPlatform => E005,
            Rule::EmptyName => E006,
            Rule::DuplicatePlugin => E007,
            Rule::MissingBinaries => E008,
            Rule::MalformedChecksum => E009,
            Rule::Network => E010,
            Rule::Download => E011,
            Rule::ChecksumMismatch => E012,
            Rule::DuplicatePlatform => W001,
        }
    }
}

/// A structured diagnostic message from catalog validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Violated rule.
    pub rule: Rule,
    /// Stable code derived from the rule (e.g., `"E003"`).
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Plugin the diagnostic refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Binary platform the diagnostic refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Binary URL the diagnostic refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Suggested fix (actionable text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic for `rule` with the given severity and message.
    #[must_use]
    pub fn new(severity: Severity, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule,
            code: rule.code(),
            message: message.into(),
            plugin: None,
            platform: None,
            url: None,
            suggestion: None,
        }
    }

    /// Shorthand for an error-severity diagnostic.
    #[must_use]
    pub fn error(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, rule, message)
    }

    /// Set the plugin this diagnostic refers to.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    /// Set the binary platform this diagnostic refers to.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the binary URL this diagnostic refers to.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set a suggested fix for this diagnostic.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns `true` if this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Returns `true` if this diagnostic is a warning.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Errors print as the bare message, warnings with a `warning:` prefix.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "{}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

// ── Error code constants ────────────────────────────────────────────────

// Catalog-level errors (E000–E001)

/// Infrastructure error (file not found, IO error, parse failure).
pub const E000: &str = "E000";
/// Catalog is not in canonical sorted form.
pub const E001: &str = "E001";

// Structural errors (E002–E009)

/// Version is not valid semver.
pub const E002: &str = "E002";
/// URL is unparseable or its scheme is not `https`.
pub const E003: &str = "E003";
/// URL does not begin with `https` or `ftps`.
pub const E004: &str = "E004";
/// Platform is not supported.
pub const E005: &str = "E005";
/// Plugin name is empty.
pub const E006: &str = "E006";
/// Plugin name is duplicated.
pub const E007: &str = "E007";
/// Plugin has no binaries.
pub const E008: &str = "E008";
/// Checksum is not 40 lowercase hex characters.
pub const E009: &str = "E009";

// Checksum verification errors (E010–E012)

/// Network failure while fetching a binary.
pub const E010: &str = "E010";
/// Binary URL returned a non-success status.
pub const E011: &str = "E011";
/// Binary content does not match the declared checksum.
pub const E012: &str = "E012";

// Warning codes (W001)

/// Platform listed twice within one plugin.
pub const W001: &str = "W001";

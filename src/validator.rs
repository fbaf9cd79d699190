use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{is_supported_platform, SUPPORTED_PLATFORMS};
use crate::diagnostics::{Diagnostic, Rule, Severity};
use crate::models::{Binary, Catalog, Plugin};

/// Full semver 2.0.0 grammar, checked after the `semver` crate accepts a version.
static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("semver regex")
});

/// Loose secure-link check: the URL text must start with `https` or `ftps`.
static SECURE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https|ftps)").expect("secure prefix regex"));

/// Declared checksums: 160-bit digest as lowercase hex.
static CHECKSUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("checksum regex"));

const SECURE_LINK_HINT: &str =
    "Provide a download link served over TLS, for example a GitHub release asset";

/// Run every structural check over the catalog, in catalog order.
///
/// Per plugin: name, version, binary list, then per binary: transport,
/// download link, platform, checksum format. Duplicate-platform warnings
/// follow the plugin's binary checks.
#[must_use]
pub fn validate_catalog(catalog: &Catalog) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for plugin in &catalog.plugins {
        if plugin.name.is_empty() {
            diags.push(
                Diagnostic::error(Rule::EmptyName, "plugin name must not be empty")
                    .with_plugin(""),
            );
        } else if !seen_names.insert(plugin.name.as_str()) {
            diags.push(
                Diagnostic::error(
                    Rule::DuplicatePlugin,
                    format!("Plugin '{}' is listed more than once", plugin.name),
                )
                .with_plugin(&plugin.name),
            );
        }

        diags.extend(validate_version(plugin));
        diags.extend(validate_plugin_binaries(plugin));
    }

    diags
}

fn validate_plugin_binaries(plugin: &Plugin) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    if plugin.binaries.is_empty() {
        diags.push(
            Diagnostic::error(
                Rule::MissingBinaries,
                format!("Plugin '{}' does not list any binaries", plugin.name),
            )
            .with_plugin(&plugin.name),
        );
        return diags;
    }

    for binary in &plugin.binaries {
        diags.extend(validate_transport(plugin, binary));
        diags.extend(validate_download_link(plugin, binary));
        diags.extend(validate_platform(plugin, binary));
        diags.extend(validate_checksum_format(plugin, binary));
    }

    let mut seen_platforms: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for binary in &plugin.binaries {
        let platform = binary.platform.as_str();
        if !seen_platforms.insert(platform) && reported.insert(platform) {
            diags.push(
                Diagnostic::new(
                    Severity::Warning,
                    Rule::DuplicatePlatform,
                    format!(
                        "Plugin '{}' lists platform '{platform}' more than once",
                        plugin.name
                    ),
                )
                .with_plugin(&plugin.name)
                .with_platform(platform),
            );
        }
    }

    diags
}

/// Check that a plugin's version is a well-formed semantic version.
///
/// Two checks apply: the `semver` crate must parse it, and the text must
/// match the full semver grammar.
#[must_use]
pub fn validate_version(plugin: &Plugin) -> Option<Diagnostic> {
    let version = plugin.version.as_str();
    let problem = match semver::Version::parse(version) {
        Err(e) => Some(e.to_string()),
        Ok(_) if !SEMVER_RE.is_match(version) => {
            Some("not in major.minor.patch[-pre][+build] form".to_string())
        }
        Ok(_) => None,
    }?;

    Some(
        Diagnostic::error(
            Rule::InvalidVersion,
            format!(
                "Plugin '{}' has a non-semver version '{version}': {problem}",
                plugin.name
            ),
        )
        .with_plugin(&plugin.name)
        .with_suggestion("Use major.minor.patch, e.g. \"1.0.0\""),
    )
}

/// Check that a binary URL parses and its scheme is exactly `https`.
#[must_use]
pub fn validate_transport(plugin: &Plugin, binary: &Binary) -> Option<Diagnostic> {
    let message = match url::Url::parse(&binary.url) {
        Ok(url) if url.scheme() == "https" => return None,
        Ok(url) => format!(
            "Plugin '{}' serves platform '{}' over '{}' instead of https: {}",
            plugin.name,
            binary.platform,
            url.scheme(),
            binary.url
        ),
        Err(e) => format!(
            "Plugin '{}' has an unparseable URL for platform '{}': {} ({e})",
            plugin.name, binary.platform, binary.url
        ),
    };

    Some(binary_diag(Rule::InsecureTransport, message, plugin, binary))
}

/// Check that the binary URL text begins with `https` or `ftps`.
///
/// Looser than [`validate_transport`]: the prefix is matched on the raw
/// string, so `httpsx://` passes here while failing the strict check.
#[must_use]
pub fn validate_download_link(plugin: &Plugin, binary: &Binary) -> Option<Diagnostic> {
    if SECURE_PREFIX_RE.is_match(&binary.url) {
        return None;
    }
    Some(
        binary_diag(
            Rule::InsecureDownloadLink,
            format!(
                "Plugin '{}' links to a binary URL '{}' that cannot be downloaded over SSL (must begin with https or ftps)",
                plugin.name, binary.url
            ),
            plugin,
            binary,
        )
        .with_suggestion(SECURE_LINK_HINT),
    )
}

/// Check that the binary platform is one of the supported platforms.
#[must_use]
pub fn validate_platform(plugin: &Plugin, binary: &Binary) -> Option<Diagnostic> {
    if is_supported_platform(&binary.platform) {
        return None;
    }
    Some(
        binary_diag(
            Rule::UnknownPlatform,
            format!(
                "Plugin '{}' contains an invalid platform '{}'",
                plugin.name, binary.platform
            ),
            plugin,
            binary,
        )
        .with_suggestion(format!("Use one of: {}", SUPPORTED_PLATFORMS.join(", "))),
    )
}

/// Check that the declared checksum is 40 lowercase hex characters.
#[must_use]
pub fn validate_checksum_format(plugin: &Plugin, binary: &Binary) -> Option<Diagnostic> {
    if CHECKSUM_RE.is_match(&binary.checksum) {
        return None;
    }
    Some(binary_diag(
        Rule::MalformedChecksum,
        format!(
            "Plugin '{}' declares a malformed checksum '{}' for platform '{}' (expected 40 lowercase hex characters)",
            plugin.name, binary.checksum, binary.platform
        ),
        plugin,
        binary,
    ))
}

/// Error diagnostic carrying full binary context.
pub(crate) fn binary_diag(
    rule: Rule,
    message: String,
    plugin: &Plugin,
    binary: &Binary,
) -> Diagnostic {
    Diagnostic::error(rule, message)
        .with_plugin(&plugin.name)
        .with_platform(&binary.platform)
        .with_url(&binary.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_catalog;

    const SHA: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    fn binary(platform: &str, url: &str) -> Binary {
        Binary {
            platform: platform.to_string(),
            url: url.to_string(),
            checksum: SHA.to_string(),
        }
    }

    fn plugin(name: &str, version: &str, binaries: Vec<Binary>) -> Plugin {
        Plugin {
            name: name.to_string(),
            description: None,
            version: version.to_string(),
            created: None,
            updated: None,
            company: None,
            authors: None,
            homepage: None,
            binaries,
        }
    }

    fn with_version(version: &str) -> Plugin {
        plugin(
            "demo",
            version,
            vec![binary("linux64", "https://example.com/demo")],
        )
    }

    fn rules(diags: &[Diagnostic]) -> Vec<Rule> {
        diags.iter().map(|d| d.rule).collect()
    }

    // ── version ─────────────────────────────────────────────────────

    #[test]
    fn plain_semver_accepted() {
        for v in ["0.0.0", "1.2.3", "10.20.30", "1.0.0-rc.1", "1.0.0+build.5"] {
            assert!(validate_version(&with_version(v)).is_none(), "{v}");
        }
    }

    #[test]
    fn malformed_versions_rejected() {
        for v in ["1.0", "v1.0.0", "1", "01.0.0", "1.0.0-", "1.0.0.0", " 1.0.0", ""] {
            let d = validate_version(&with_version(v));
            assert_eq!(d.map(|d| d.rule), Some(Rule::InvalidVersion), "{v:?}");
        }
    }

    #[test]
    fn version_error_names_plugin() {
        let d = validate_version(&with_version("1.0")).unwrap();
        assert!(d.message.contains("Plugin 'demo'"));
        assert!(d.message.contains("'1.0'"));
        assert_eq!(d.plugin.as_deref(), Some("demo"));
    }

    // ── transport ───────────────────────────────────────────────────

    #[test]
    fn https_url_passes_strict_check() {
        let p = with_version("1.0.0");
        assert!(validate_transport(&p, &p.binaries[0]).is_none());
    }

    #[test]
    fn http_url_fails_strict_check() {
        let p = with_version("1.0.0");
        let b = binary("linux64", "http://example.com/demo");
        let d = validate_transport(&p, &b).unwrap();
        assert_eq!(d.rule, Rule::InsecureTransport);
        assert_eq!(d.url.as_deref(), Some("http://example.com/demo"));
        assert!(d.message.contains("'http'"));
    }

    #[test]
    fn unparseable_url_fails_strict_check() {
        let p = with_version("1.0.0");
        let b = binary("linux64", "not a url");
        let d = validate_transport(&p, &b).unwrap();
        assert_eq!(d.rule, Rule::InsecureTransport);
        assert!(d.message.contains("unparseable"));
    }

    #[test]
    fn ftps_url_fails_strict_but_passes_prefix() {
        let p = with_version("1.0.0");
        let b = binary("linux64", "ftps://example.com/demo");
        assert!(validate_transport(&p, &b).is_some());
        assert!(validate_download_link(&p, &b).is_none());
    }

    #[test]
    fn prefix_check_accepts_httpsx_strict_check_rejects() {
        let p = with_version("1.0.0");
        let b = binary("linux64", "httpsx://example.com/demo");
        assert!(validate_download_link(&p, &b).is_none());
        assert_eq!(
            validate_transport(&p, &b).map(|d| d.rule),
            Some(Rule::InsecureTransport)
        );
    }

    #[test]
    fn prefix_check_rejects_http() {
        let p = with_version("1.0.0");
        let b = binary("linux64", "http://example.com/demo");
        let d = validate_download_link(&p, &b).unwrap();
        assert_eq!(d.rule, Rule::InsecureDownloadLink);
        assert!(d.suggestion.is_some());
    }

    // ── platform ────────────────────────────────────────────────────

    #[test]
    fn every_supported_platform_accepted() {
        let p = with_version("1.0.0");
        for platform in SUPPORTED_PLATFORMS {
            let b = binary(platform, "https://example.com/demo");
            assert!(validate_platform(&p, &b).is_none(), "{platform}");
        }
    }

    #[test]
    fn unknown_platform_rejected() {
        let p = with_version("1.0.0");
        let b = binary("amd64-beos", "https://example.com/demo");
        let d = validate_platform(&p, &b).unwrap();
        assert_eq!(d.rule, Rule::UnknownPlatform);
        assert_eq!(d.platform.as_deref(), Some("amd64-beos"));
        assert!(d.suggestion.unwrap().contains("linux64"));
    }

    // ── checksum format ─────────────────────────────────────────────

    #[test]
    fn checksum_format() {
        let p = with_version("1.0.0");
        let mut b = binary("osx", "https://example.com/demo");
        assert!(validate_checksum_format(&p, &b).is_none());
        let upper = SHA.to_uppercase();
        for bad in [
            &SHA[..39],
            upper.as_str(),
            "zz39a3ee5e6b4b0d3255bfef95601890afd80709",
        ] {
            b.checksum = bad.to_string();
            assert_eq!(
                validate_checksum_format(&p, &b).map(|d| d.rule),
                Some(Rule::MalformedChecksum),
                "{bad}"
            );
        }
    }

    // ── whole catalog ───────────────────────────────────────────────

    #[test]
    fn valid_catalog_has_no_diagnostics() {
        let catalog = Catalog {
            plugins: vec![
                with_version("1.0.0"),
                plugin(
                    "other",
                    "2.1.0",
                    vec![
                        binary("osx", "https://example.com/o"),
                        binary("win64", "https://example.com/o.exe"),
                    ],
                ),
            ],
        };
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn one_transport_error_per_http_binary() {
        let catalog = Catalog {
            plugins: vec![plugin(
                "demo",
                "1.0.0",
                vec![
                    binary("linux64", "http://example.com/a"),
                    binary("osx", "https://example.com/b"),
                    binary("win64", "http://example.com/c"),
                ],
            )],
        };
        let diags = validate_catalog(&catalog);
        let transport: Vec<_> = diags
            .iter()
            .filter(|d| d.rule == Rule::InsecureTransport)
            .map(|d| d.platform.as_deref().unwrap())
            .collect();
        assert_eq!(transport, ["linux64", "win64"]);
    }

    #[test]
    fn checks_continue_after_first_failure() {
        let catalog = Catalog {
            plugins: vec![
                plugin("a", "1.0", vec![binary("amd64-beos", "http://x.example/a")]),
                plugin("b", "v2", vec![binary("linux64", "https://x.example/b")]),
            ],
        };
        let diags = validate_catalog(&catalog);
        assert_eq!(
            rules(&diags),
            [
                Rule::InvalidVersion,
                Rule::InsecureTransport,
                Rule::InsecureDownloadLink,
                Rule::UnknownPlatform,
                Rule::InvalidVersion,
            ]
        );
        assert_eq!(diags[4].plugin.as_deref(), Some("b"));
    }

    #[test]
    fn missing_binaries_and_empty_name() {
        let catalog = Catalog {
            plugins: vec![plugin("", "1.0.0", vec![])],
        };
        assert_eq!(
            rules(&validate_catalog(&catalog)),
            [Rule::EmptyName, Rule::MissingBinaries]
        );
    }

    #[test]
    fn duplicate_plugin_reported_once_per_repeat() {
        let catalog = Catalog {
            plugins: vec![
                with_version("1.0.0"),
                with_version("1.0.0"),
                with_version("1.0.0"),
            ],
        };
        let diags = validate_catalog(&catalog);
        assert_eq!(rules(&diags), [Rule::DuplicatePlugin, Rule::DuplicatePlugin]);
    }

    #[test]
    fn duplicate_platform_is_warning() {
        let catalog = Catalog {
            plugins: vec![plugin(
                "demo",
                "1.0.0",
                vec![
                    binary("osx", "https://example.com/a"),
                    binary("osx", "https://example.com/b"),
                    binary("osx", "https://example.com/c"),
                ],
            )],
        };
        let diags = validate_catalog(&catalog);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_warning());
        assert_eq!(diags[0].rule, Rule::DuplicatePlatform);
    }

    #[test]
    fn validates_parsed_yaml() {
        let raw = "\
plugins:
- name: beos-tool
  version: 1.0.0
  binaries:
  - platform: amd64-beos
    url: https://example.com/tool
    checksum: da39a3ee5e6b4b0d3255bfef95601890afd80709
";
        let catalog = parse_catalog(raw.as_bytes()).unwrap();
        assert_eq!(rules(&validate_catalog(&catalog)), [Rule::UnknownPlatform]);
    }
}

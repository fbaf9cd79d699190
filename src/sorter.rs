//! Canonical catalog form: plugins ordered by name, binaries ordered by
//! platform then URL, every field emitted in a fixed order.
//!
//! Canonicalization is a pure function of its input bytes and is
//! idempotent: sorting canonical output yields the same bytes again.
//! Nothing here writes back to disk.

use similar::TextDiff;

use crate::errors::{CatalogError, Result};
use crate::models::Catalog;
use crate::parser::parse_catalog;

/// Produce the canonical serialization of raw catalog bytes.
///
/// # Errors
///
/// Returns [`CatalogError::Sort`] if the input cannot be parsed or the
/// sorted catalog cannot be re-serialized.
pub fn sort(raw: &[u8]) -> Result<Vec<u8>> {
    let mut catalog = parse_catalog(raw).map_err(|e| CatalogError::Sort {
        message: e.to_string(),
    })?;
    sort_catalog(&mut catalog);
    serialize(&catalog)
}

/// Reorder a parsed catalog in place into canonical order.
///
/// Both sorts are stable and compare names, platforms and URLs bytewise.
pub fn sort_catalog(catalog: &mut Catalog) {
    catalog.plugins.sort_by(|a, b| a.name.cmp(&b.name));
    for plugin in &mut catalog.plugins {
        plugin
            .binaries
            .sort_by(|a, b| (&a.platform, &a.url).cmp(&(&b.platform, &b.url)));
    }
}

/// Serialize a catalog as-is, with fixed field emission order.
pub fn serialize(catalog: &Catalog) -> Result<Vec<u8>> {
    serde_yaml_ng::to_string(catalog)
        .map(String::into_bytes)
        .map_err(|e| CatalogError::Sort {
            message: e.to_string(),
        })
}

/// Returns `true` if `raw` is already byte-identical to its canonical form.
pub fn is_canonical(raw: &[u8]) -> Result<bool> {
    Ok(sort(raw)? == raw)
}

/// Render a unified diff from `original` to `canonical`, labelled with `label`.
#[must_use]
pub fn diff(original: &[u8], canonical: &[u8], label: &str) -> String {
    let original = String::from_utf8_lossy(original);
    let canonical = String::from_utf8_lossy(canonical);
    let text_diff = TextDiff::from_lines(original.as_ref(), canonical.as_ref());
    let rendered = text_diff
        .unified_diff()
        .context_radius(3)
        .header(label, &format!("{label} (sorted)"))
        .to_string();
    rendered
}

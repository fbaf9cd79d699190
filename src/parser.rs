use std::path::Path;

use crate::errors::{CatalogError, Result};
use crate::models::Catalog;

/// Deserialize raw catalog bytes, preserving plugin and binary order.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] for malformed YAML, wrong field types,
/// or missing required fields.
pub fn parse_catalog(raw: &[u8]) -> Result<Catalog> {
    serde_yaml_ng::from_slice(raw).map_err(|e| CatalogError::Parse {
        message: e.to_string(),
    })
}

/// Read the raw bytes of a catalog file.
pub fn read_catalog_bytes(path: &Path) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Full pipeline: read file → parse → return catalog.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    parse_catalog(&read_catalog_bytes(path)?)
}

use thiserror::Error;

/// Errors that abort a catalog operation outright.
///
/// Rule violations found while validating a parsed catalog are not errors
/// in this sense; they are reported as [`crate::diagnostics::Diagnostic`]s.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog bytes do not match the catalog schema.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The catalog could not be brought into canonical form.
    #[error("sort error: {message}")]
    Sort { message: String },

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Convenience alias for `Result<T, CatalogError>`.
pub type Result<T> = std::result::Result<T, CatalogError>;

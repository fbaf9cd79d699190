pub mod checksum;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod pool;
pub mod sorter;
pub mod validator;

// Re-export key types at crate root for convenience.
pub use checksum::{ChecksumVerifier, VerifyError};
pub use config::{Config, SUPPORTED_PLATFORMS};
pub use diagnostics::{Diagnostic, Rule, Severity};
pub use errors::{CatalogError, Result};
pub use models::{Author, Binary, Catalog, Plugin};
pub use parser::{parse_catalog, read_catalog};
pub use pipeline::{run, run_file, ChecksumStatus, Outcome, Report};
pub use sorter::{is_canonical, sort};

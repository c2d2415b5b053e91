//! Error types for inventory loading.
//!
//! Parsing itself never fails: malformed input degrades to a best-effort
//! model. Errors only arise from filesystem access and YAML decoding in
//! directory mode.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for inventory loading operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Error type for inventory loading.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A file or directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `group_vars`/`host_vars` side file is not valid YAML.
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

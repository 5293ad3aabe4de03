//! Configuration Error Types
//!
//! Fatal errors detected before any task is scheduled. Per-task conversion
//! errors never reach this tier; they are caught at the codec adapter
//! boundary and folded into `ConversionOutcome::Failure`.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Root folder does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Root folder is not readable: {path}: {source}")]
    RootNotReadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Validate the root folder before scheduling any work.
///
/// Fails fast with a `ConfigError` so the run aborts with a non-zero exit
/// before Discovery or any conversion is attempted.
pub fn validate_root(root: &Path) -> Result<(), ConfigError> {
    if !root.exists() {
        return Err(ConfigError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConfigError::NotADirectory(root.to_path_buf()));
    }
    std::fs::read_dir(root).map_err(|e| ConfigError::RootNotReadable {
        path: root.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

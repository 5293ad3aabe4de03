//! Run Configuration
//!
//! Built once from the CLI at startup and read-only for the rest of the run.

use std::path::PathBuf;

pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_QUALITY: u8 = 100;
pub const DEFAULT_EXTENSIONS: &[&str] = &[".heic", ".heif"];

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root folder to scan.
    pub root: PathBuf,
    /// Upper bound on concurrent conversions.
    pub max_workers: usize,
    /// JPEG encoder quality, 1-100.
    pub quality: u8,
    /// Suppress source-file deletion on success.
    pub keep_originals: bool,
    /// Normalized (dot-less, lowercase) extension filters.
    pub extensions: Vec<String>,
    /// Recurse into subdirectories.
    pub recursive: bool,
    /// Extra configuration echo on stdout.
    pub verbose: bool,
}

impl RunConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            max_workers: DEFAULT_WORKERS,
            quality: DEFAULT_QUALITY,
            keep_originals: false,
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            recursive: true,
            verbose: false,
        }
    }
}

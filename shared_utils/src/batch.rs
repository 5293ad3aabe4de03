//! Discovery Module
//!
//! Walks a directory tree, filters regular files by extension
//! (case-insensitive), and plans one `ConversionTask` per match.
//!
//! Traversal order is deterministic: entries are visited lexicographically
//! at each directory level so repeated runs over the same tree produce the
//! same task list. Symbolic links are not followed (walkdir default).

use crate::conversion::ConversionTask;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Normalize user-supplied extension filters: strip a leading dot and
/// lowercase, so `.HEIC`, `heic` and `.heic` all match the same files.
pub fn normalize_extensions(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Case-insensitive extension match against an already-normalized list.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .map(|e| extensions.iter().any(|want| *want == e))
        .unwrap_or(false)
}

/// Recursively enumerate regular files under `dir` whose extension matches.
///
/// `extensions` must already be normalized (see [`normalize_extensions`]).
/// Unreadable entries below the root are skipped rather than failing the
/// whole walk; the root itself is validated separately before this runs.
pub fn collect_files(dir: &Path, extensions: &[String], recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir).sort_by_file_name()
    } else {
        WalkDir::new(dir).max_depth(1).sort_by_file_name()
    };

    walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Plan one task per discovered file: destination is the source path with
/// `target_ext` swapped in, in the same directory.
pub fn plan_tasks(files: &[PathBuf], target_ext: &str) -> Vec<ConversionTask> {
    files
        .iter()
        .map(|src| ConversionTask::new(src.clone(), src.with_extension(target_ext)))
        .collect()
}

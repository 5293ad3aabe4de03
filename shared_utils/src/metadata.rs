//! Metadata Preservation Module
//!
//! Carries source metadata forward to the converted file:
//! - Embedded metadata (EXIF/IPTC/XMP) verbatim via an `exiftool`
//!   subprocess when the tool is installed. Nothing is invented: if the
//!   source carries no metadata, the destination gets none.
//! - File timestamps (mtime/atime) via `filetime`.
//!
//! Both operations are best-effort from the caller's point of view; a
//! conversion whose pixels were written successfully is not failed over a
//! metadata copy problem.

use filetime::FileTime;
use std::io;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Cached exiftool availability (checked once per process).
static EXIFTOOL_AVAILABLE: OnceLock<bool> = OnceLock::new();

fn is_exiftool_available() -> bool {
    *EXIFTOOL_AVAILABLE.get_or_init(|| which::which("exiftool").is_ok())
}

/// Copy all embedded metadata from `src` into `dst` in place.
///
/// Returns `Ok(false)` when exiftool is not installed (nothing copied),
/// `Ok(true)` on a successful copy.
pub fn copy_exif_metadata(src: &Path, dst: &Path) -> io::Result<bool> {
    if !is_exiftool_available() {
        tracing::warn!(
            src = %src.display(),
            "exiftool not found, embedded metadata not carried over"
        );
        return Ok(false);
    }

    let output = Command::new("exiftool")
        .arg("-TagsFromFile")
        .arg(src)
        .arg("-all:all")
        .arg("-overwrite_original")
        .arg(dst)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(format!(
            "exiftool exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(true)
}

/// Copy mtime/atime from `src` onto `dst`.
pub fn copy_file_times(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = std::fs::metadata(src)?;
    let mtime = FileTime::from_last_modification_time(&meta);
    let atime = FileTime::from_last_access_time(&meta);
    filetime::set_file_times(dst, atime, mtime)
}

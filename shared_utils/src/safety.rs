//! Safety Module
//!
//! Refuses to run destructive operations (originals are deleted after
//! conversion by default) directly on system directories.

use std::path::Path;

const DANGEROUS_DIRS: &[&str] = &[
    "/",
    "/System",
    "/usr",
    "/bin",
    "/sbin",
    "/etc",
    "/var",
    "/Library",
    "/Applications",
    "/Users",
    "/home",
    "/boot",
    "/dev",
    "/proc",
    "/sys",
    "/opt",
];

pub fn check_dangerous_directory(path: &Path) -> Result<(), String> {
    let path_str = path.to_string_lossy();

    for dangerous in DANGEROUS_DIRS {
        if path_str == *dangerous {
            return Err(format!(
                "🚨 DANGEROUS OPERATION BLOCKED!\n\
                 ❌ Target directory '{}' is a protected system directory.\n\
                 ❌ Originals are deleted after conversion; running here could cause irreversible damage.\n\
                 \n\
                 💡 Specify a safe subdirectory instead, or pass --keep-originals.",
                dangerous
            ));
        }
    }

    Ok(())
}

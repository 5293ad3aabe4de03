//! Logging Module
//!
//! Tracing-based logging: structured events go to a daily-rotated file in
//! the system temp directory; only warnings and above reach stderr so the
//! progress bar stays readable. Old log files beyond a retention count are
//! cleaned up at startup.
//!
//! # Examples
//!
//! ```no_run
//! use shared_utils::logging::{init_logging, LogConfig};
//!
//! init_logging("img_jpeg", LogConfig::default()).expect("Failed to init logging");
//! tracing::info!("started");
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for log files (defaults to the system temp directory).
    pub log_dir: PathBuf,
    /// How many rotated log files to keep.
    pub max_files: usize,
    /// Default level when RUST_LOG is not set.
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: std::env::temp_dir(),
            max_files: 5,
            level: Level::INFO,
        }
    }
}

impl LogConfig {
    pub fn with_log_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.log_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Log file name is `{program_name}.log`, rotated daily. Returns an error if
/// the log directory cannot be created or a subscriber is already installed.
pub fn init_logging(program_name: &str, config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let log_file_name = format!("{}.log", program_name);
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, &log_file_name);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        program = program_name,
        log_dir = ?config.log_dir,
        "Logging initialized"
    );

    cleanup_old_logs(&config.log_dir, program_name, config.max_files)?;

    Ok(())
}

/// Keep only the most recent `max_files` rotated logs for this program.
fn cleanup_old_logs(log_dir: &Path, program_name: &str, max_files: usize) -> Result<()> {
    let entries = std::fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {:?}", log_dir))?;

    let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if name.starts_with(program_name) && name.contains(".log") {
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                log_files.push((path, modified));
            }
        }
    }

    if log_files.len() > max_files {
        log_files.sort_by(|a, b| b.1.cmp(&a.1));
        for (path, _) in log_files.iter().skip(max_files) {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = ?path, error = %e, "Failed to remove old log file");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_keeps_most_recent() {
        let temp = TempDir::new().unwrap();
        for i in 0..8i64 {
            let path = temp.path().join(format!("prog.log.2026-08-{:02}", i + 1));
            fs::write(&path, b"log").unwrap();
            let t = filetime::FileTime::from_unix_time(1_700_000_000 + i * 86_400, 0);
            filetime::set_file_mtime(&path, t).unwrap();
        }

        cleanup_old_logs(temp.path(), "prog", 3).unwrap();

        let remaining = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(remaining, 3);
    }

    #[test]
    fn test_cleanup_ignores_other_programs() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("other.log"), b"x").unwrap();
        fs::write(temp.path().join("prog.log"), b"x").unwrap();

        cleanup_old_logs(temp.path(), "prog", 5).unwrap();

        assert!(temp.path().join("other.log").exists());
        assert!(temp.path().join("prog.log").exists());
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::default()
            .with_log_dir("/tmp/img_jpeg_logs")
            .with_level(Level::DEBUG);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/img_jpeg_logs"));
        assert_eq!(config.level, Level::DEBUG);
    }
}

//! Shared utilities for the img_jpeg batch converter
//!
//! This crate provides the batch pipeline around the actual codec work:
//! - Directory discovery and task planning
//! - Bounded-concurrency worker pool
//! - Thread-safe progress tracking
//! - Result aggregation and summary reporting
//! - Metadata preservation (EXIF via exiftool, timestamps)
//! - Safety checks (dangerous directory detection)
//! - Logging setup

pub mod batch;
pub mod conversion;
pub mod errors;
pub mod logging;
pub mod metadata;
pub mod pool;
pub mod progress;
pub mod report;
pub mod safety;

pub use batch::{collect_files, has_extension, normalize_extensions, plan_tasks};
pub use conversion::{ConversionOutcome, ConversionTask};
pub use errors::{validate_root, ConfigError};
pub use metadata::{copy_exif_metadata, copy_file_times};
pub use pool::run_batch;
pub use progress::BatchProgress;
pub use report::{print_summary_report, summarize, FailureEntry, RunSummary};
pub use safety::check_dangerous_directory;

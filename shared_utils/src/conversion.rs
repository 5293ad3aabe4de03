//! Conversion Task and Outcome Types
//!
//! One task per source file; exactly one outcome per task. Tasks are
//! immutable once planned, outcomes are produced by the codec adapter and
//! consumed by both the progress tracker and the result aggregator.

use std::path::{Path, PathBuf};

/// One source-file-to-destination-file unit of work.
///
/// `destination` lives in the same directory as `source` with the target
/// format's extension swapped in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ConversionTask {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Filename of the source, for progress display.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Tagged result of executing one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Success {
        source: PathBuf,
        destination: PathBuf,
    },
    Failure {
        source: PathBuf,
        reason: String,
    },
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }

    /// The originating task's source path, for reconciling outcomes to tasks.
    pub fn source(&self) -> &Path {
        match self {
            ConversionOutcome::Success { source, .. } => source,
            ConversionOutcome::Failure { source, .. } => source,
        }
    }

    pub fn file_name(&self) -> String {
        self.source()
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_file_name() {
        let task = ConversionTask::new(
            PathBuf::from("/photos/trip/IMG_0001.heic"),
            PathBuf::from("/photos/trip/IMG_0001.jpg"),
        );
        assert_eq!(task.file_name(), "IMG_0001.heic");
    }

    #[test]
    fn test_outcome_source_success() {
        let outcome = ConversionOutcome::Success {
            source: PathBuf::from("a.heic"),
            destination: PathBuf::from("a.jpg"),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.source(), Path::new("a.heic"));
    }

    #[test]
    fn test_outcome_source_failure() {
        let outcome = ConversionOutcome::Failure {
            source: PathBuf::from("b.heic"),
            reason: "decode failed".to_string(),
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.source(), Path::new("b.heic"));
        assert_eq!(outcome.file_name(), "b.heic");
    }
}

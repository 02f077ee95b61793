//! Error collection and reporting for index builds

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use crate::error::SearchError;

/// Stage where an error occurred during processing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ProcessingStage {
    FileRead,
    Parse,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::FileRead => write!(f, "File Read"),
            ProcessingStage::Parse => write!(f, "Parse"),
        }
    }
}

/// Error that occurred while processing a file
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub error: String,
    pub stage: ProcessingStage,
}

impl FileError {
    pub fn new(path: PathBuf, error: &SearchError) -> Self {
        let stage = match error {
            SearchError::Read { .. } => ProcessingStage::FileRead,
            _ => ProcessingStage::Parse,
        };
        Self {
            path,
            error: error.to_string(),
            stage,
        }
    }
}

/// Detailed error report with statistics
pub struct ErrorReport {
    pub total_errors: usize,
    pub by_stage: BTreeMap<ProcessingStage, Vec<FileError>>,
    pub summary: String,
}

impl ErrorReport {
    /// Create a report from a list of errors
    pub fn from_errors(errors: &[FileError]) -> Self {
        let mut by_stage: BTreeMap<ProcessingStage, Vec<FileError>> = BTreeMap::new();

        for error in errors {
            by_stage.entry(error.stage).or_default().push(error.clone());
        }

        let summary = if errors.is_empty() {
            "No errors occurred during indexing".to_string()
        } else {
            format!("Indexing skipped {} files", errors.len())
        };

        Self {
            total_errors: errors.len(),
            by_stage,
            summary,
        }
    }

    /// Log a summary of the errors, with a few examples per stage
    pub fn log_summary(&self) {
        if self.total_errors == 0 {
            return;
        }

        warn!("{}", self.summary);
        for (stage, errors) in &self.by_stage {
            warn!("  {}: {} errors", stage, errors.len());

            for error in errors.iter().take(5) {
                warn!("    - {}: {}", error.path.display(), error.error);
            }

            if errors.len() > 5 {
                warn!("    ... and {} more", errors.len() - 5);
            }
        }
    }

    /// Check if any errors occurred
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

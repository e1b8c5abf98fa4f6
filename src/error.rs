// Error types for the library core
// Every error here is recoverable: re-import, fix the parameter, or reset.

use std::path::PathBuf;
use thiserror::Error;

/// Import failures (invalid-input): surfaced inline, never fatal
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("unsupported file type: {file_name} (expected .csv or .txt)")]
    UnsupportedFileType { file_name: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Draw failures (empty-pool): the UI disables the action instead of crashing
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    #[error("no eligible participants left in the pool")]
    PoolEmpty,

    #[error("a draw is already in progress")]
    InProgress,
}

/// Grouping failures (invalid-parameter)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupError {
    #[error("invalid group size {0} (must be at least 1)")]
    InvalidSize(usize),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export: generate groups first")]
    NothingToExport,

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Short message shown next to the import controls
    pub fn user_message(&self) -> String {
        match self {
            ImportError::UnsupportedFileType { .. } => {
                "Please choose a .csv or .txt file".to_string()
            }
            ImportError::Read { .. } => "Failed to read file".to_string(),
        }
    }
}

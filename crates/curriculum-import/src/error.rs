//! Error types for the import pipeline

use curriculum_common::CurriculumError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Every variant aborts the run; nothing is retried.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A directory or file under the base directory could not be read
    #[error("File system error at {}: {message}", path.display())]
    FileSystem { path: PathBuf, message: String },

    /// A curriculum file is malformed or misses required fields
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: CurriculumError,
    },

    /// The destination store could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// A write was rejected or the transport failed mid-write
    #[error("Write error: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    pub fn file_system(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::FileSystem {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn load(path: impl AsRef<Path>, source: CurriculumError) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True when the document failed schema checks (required field missing)
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Load { source, .. } if source.is_schema())
    }

    /// True when the document was not valid JSON
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Load { source, .. } if source.is_parse())
    }
}

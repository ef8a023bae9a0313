//! Typed failures for the extraction engine
//!
//! Every operation either succeeds (possibly with zero results) or fails with
//! exactly one of these variants. Nothing is rendered on failure.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A user-supplied parameter is out of range
    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Error reading file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source could not be turned into a document (invalid UTF-8)
    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Invalid regex pattern: {pattern}. Error: {message}")]
    Pattern { pattern: String, message: String },
}

impl ExtractError {
    /// Stable tag for the error family
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Validation(_) => "validation",
            ExtractError::NotFound(_) | ExtractError::NotAFile(_) | ExtractError::Io { .. } => {
                "io"
            }
            ExtractError::Parse(_) => "parse",
            ExtractError::Pattern { .. } => "pattern",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

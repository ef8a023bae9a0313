//! Source file reading
//!
//! Provides consistent handling for:
//! - Missing paths and non-regular files
//! - Unreadable files
//! - Non-UTF-8 content

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::error::{ExtractError, Result};

/// Check that `path` names an existing regular file
pub fn validate_file(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ExtractError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.is_file() {
        return Err(ExtractError::NotAFile(path.to_path_buf()));
    }

    Ok(())
}

/// Read the raw bytes of a source file
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    validate_file(path)?;
    debug!("Opening file: {}", path.display());

    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("File read successfully ({} bytes)", bytes.len());

    Ok(bytes)
}

/// Decode source bytes as UTF-8
///
/// Malformed encoding is the only way a document can fail to parse.
pub fn decode_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        ExtractError::Parse(format!(
            "invalid UTF-8 sequence at byte offset {}",
            e.utf8_error().valid_up_to()
        ))
    })
}

/// Read a Markdown file as UTF-8 text
pub fn read_markdown(path: &Path) -> Result<String> {
    let content = decode_utf8(read_source(path)?)?;
    if content.trim().is_empty() {
        warn!("File appears to be empty: {}", path.display());
    }
    Ok(content)
}

//! Notebook loading errors.

use std::path::PathBuf;

use super::error_code::{self, NbErrorCode};

/// Errors that can occur while reading a notebook document.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("IO error reading notebook {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Not JSON, or JSON missing `cells`, `cell_type` or `source`.
    #[error("Malformed notebook {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl NbErrorCode for NotebookError {
    fn error_code(&self) -> &'static str {
        error_code::NOTEBOOK_ERROR
    }
}

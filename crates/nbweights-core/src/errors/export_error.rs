//! Export errors (weights.json, weights.bin, model.json).

use std::path::PathBuf;

use super::error_code::{self, NbErrorCode};

/// Errors that can occur while writing or reading weight artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    #[error("Failed to read weights from {path}: {message}")]
    Deserialize { path: PathBuf, message: String },

    #[error("Tensor {index} is ragged and cannot be packed")]
    RaggedTensor { index: usize },
}

impl NbErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        error_code::EXPORT_ERROR
    }
}

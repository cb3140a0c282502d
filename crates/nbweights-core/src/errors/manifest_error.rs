//! Model manifest errors.

use super::error_code::{self, NbErrorCode};

/// Errors that can occur while deriving a layers-model manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("No tensors to describe; a model needs at least one layer")]
    NoLayers,

    #[error("Expected kernel/bias pairs, got {count} tensors")]
    OddTensorCount { count: usize },

    #[error("{name} must have rank {expected}, got rank {actual}")]
    WrongRank {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{name} has shape {actual:?}, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: String,
        actual: Vec<usize>,
    },

    #[error("Tensor {index} is ragged")]
    RaggedTensor { index: usize },
}

impl NbErrorCode for ManifestError {
    fn error_code(&self) -> &'static str {
        error_code::MANIFEST_ERROR
    }
}

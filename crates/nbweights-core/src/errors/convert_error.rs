//! Top-level conversion error.

use super::error_code::NbErrorCode;
use super::{ConfigError, ExportError, LiteralError, ManifestError, NotebookError};

/// Errors that can occur during a conversion run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Notebook error: {0}")]
    Notebook(#[from] NotebookError),

    /// A matched line failed to evaluate. `cell` and `line` are 0-based.
    #[error("Cell {cell}, line {line}: {source}")]
    Literal {
        cell: usize,
        line: usize,
        #[source]
        source: LiteralError,
    },

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NbErrorCode for ConvertError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Notebook(e) => e.error_code(),
            Self::Literal { source, .. } => source.error_code(),
            Self::Export(e) => e.error_code(),
            Self::Manifest(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

//! Error handling for nbweights.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod convert_error;
pub mod error_code;
pub mod export_error;
pub mod literal_error;
pub mod manifest_error;
pub mod notebook_error;

pub use config_error::ConfigError;
pub use convert_error::ConvertError;
pub use error_code::NbErrorCode;
pub use export_error::ExportError;
pub use literal_error::LiteralError;
pub use manifest_error::ManifestError;
pub use notebook_error::NotebookError;

//! NbErrorCode trait for stable error codes at the CLI boundary.

/// Every error enum implements this to provide a structured code string
/// that the CLI prints in front of the message.
pub trait NbErrorCode {
    /// Returns the error code string (e.g., "NOTEBOOK_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const NOTEBOOK_ERROR: &str = "NOTEBOOK_ERROR";
pub const LITERAL_ERROR: &str = "LITERAL_ERROR";
pub const EXPORT_ERROR: &str = "EXPORT_ERROR";
pub const MANIFEST_ERROR: &str = "MANIFEST_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid command-line argument
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// Font file could not be parsed
    #[error("Invalid font file {path}: {message}")]
    InvalidFont { path: String, message: String },

    /// Render error
    #[error("Render failed: {0}")]
    Render(#[from] renderer::RenderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_font(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFont {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

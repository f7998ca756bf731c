//! Render Engine error types

use thiserror::Error;

/// Render error
#[derive(Debug, Error)]
pub enum RenderError {
    /// Style values outside their domain
    #[error("invalid render style: {message}")]
    InvalidStyle { message: String },

    /// The font has no glyph for a character of the text
    #[error("font has no glyph for '{0}'")]
    MissingGlyph(char),

    /// Template bytes could not be decoded
    #[error("template decode error: {0}")]
    Decode(#[source] image::ImageError),

    /// Output could not be encoded
    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, RenderError>;

//! Font Cache error types

use contracts::{ContractError, FontVariant};
use thiserror::Error;

/// Font lookup / load error
#[derive(Debug, Error)]
pub enum FontError {
    /// Catalog file unreadable or malformed
    #[error("font catalog error: {message}")]
    Catalog { message: String },

    /// Family not present in the catalog
    #[error("unknown font family '{family}'")]
    UnknownFamily { family: String },

    /// Family present, variant not offered
    #[error("font family '{family}' has no variant '{variant}'")]
    UnknownVariant { family: String, variant: FontVariant },

    /// Font bytes could not be fetched
    #[error(transparent)]
    Fetch(#[from] ContractError),

    /// Fetched bytes are not a usable font
    #[error("invalid font data for '{family}' ({variant}): {message}")]
    InvalidFont {
        family: String,
        variant: FontVariant,
        message: String,
    },
}

impl FontError {
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, FontError>;

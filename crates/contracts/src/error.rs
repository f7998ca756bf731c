//! Layered error definitions
//!
//! Categorized by source: config / fetch / platform / sink

use thiserror::Error;

use crate::TenantId;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Fetch Errors =====
    /// Remote resource could not be fetched
    #[error("fetch error for '{url}': {message}")]
    Fetch { url: String, message: String },

    /// Remote resource fetched but not parsable
    #[error("document parse error for '{url}': {message}")]
    DocumentParse { url: String, message: String },

    // ===== Platform Errors =====
    /// Platform call failed for a tenant
    #[error("platform error for tenant {tenant_id}: {message}")]
    Platform { tenant_id: TenantId, message: String },

    // ===== Store Errors =====
    /// Subscription store failure
    #[error("subscription store error: {message}")]
    Store { message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create document parse error
    pub fn document_parse(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentParse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create platform error
    pub fn platform(tenant_id: TenantId, message: impl Into<String>) -> Self {
        Self::Platform {
            tenant_id,
            message: message.into(),
        }
    }

    /// Create store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

//! Protocol Router error types
//!
//! Only route registration can fail with an error. Dispatch never returns
//! `Err`; its outcome is always an `ExecutionResult`.

use thiserror::Error;

use crate::ContextKind;

/// Route registration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Host name empty or containing characters outside `[a-z0-9._-]`
    #[error("invalid host name '{host}'")]
    InvalidHost { host: String },

    /// Path segment empty or containing whitespace
    #[error("invalid path segment '{segment}' in route '{host}/{path}'")]
    InvalidSegment {
        host: String,
        path: String,
        segment: String,
    },

    /// A handler is already registered at this position
    #[error("route '{host}/{path}' is already registered")]
    DuplicateRoute { host: String, path: String },

    /// A catch-all parameter would shadow the parameters declared after it
    #[error("route '{host}/{path}': parameter {index} of kind {kind:?} must be declared last")]
    ShadowedParameter {
        host: String,
        path: String,
        index: usize,
        kind: ContextKind,
    },
}

/// Result alias
pub type Result<T> = std::result::Result<T, RouterError>;

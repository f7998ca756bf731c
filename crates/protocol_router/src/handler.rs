//! Route handlers

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::BoundArgs;

/// Error raised by a handler body
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a handler body
pub type HandlerResult = Result<Value, HandlerError>;

/// Structured payload returned on success (field names kept verbatim)
pub type Payload = serde_json::Map<String, Value>;

/// What a handler hands back: a value now, or a future of one
///
/// The value must be a JSON object; anything else is reported as an invalid
/// handler signature.
pub enum HandlerReply {
    Ready(HandlerResult),
    Deferred(BoxFuture<'static, HandlerResult>),
}

impl HandlerReply {
    pub fn ready(value: Value) -> Self {
        HandlerReply::Ready(Ok(value))
    }

    pub fn failed(error: impl Into<HandlerError>) -> Self {
        HandlerReply::Ready(Err(error.into()))
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = HandlerResult> + Send + 'static,
    {
        HandlerReply::Deferred(Box::pin(future))
    }
}

impl fmt::Debug for HandlerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerReply::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            HandlerReply::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Handler function stored in the route table
pub type HandlerFn = Arc<dyn Fn(BoundArgs) -> HandlerReply + Send + Sync>;

//! Dispatch: URI → route → bound arguments → payload
//!
//! Nothing raised by a handler escapes: errors and panics, on both the
//! synchronous and the deferred path, become `ExecutionResult::HandlerFailed`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::handler::{HandlerReply, HandlerResult, Payload};
use crate::table::{Miss, Route, RouteTable};
use crate::ContextValue;

/// Outcome of a dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// Handler produced a structured payload
    Success(Payload),
    /// No host registered under the URI authority
    HostNotFound,
    /// Host known, path not matched
    RouteNotFound,
    /// Parameters could not be bound, or the handler returned a non-object
    InvalidHandlerSignature,
    /// Handler returned an error or panicked
    HandlerFailed { message: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success(_))
    }

    /// Payload on success
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            ExecutionResult::Success(payload) => Some(payload),
            _ => None,
        }
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionResult::Success(_) => "success",
            ExecutionResult::HostNotFound => "host_not_found",
            ExecutionResult::RouteNotFound => "route_not_found",
            ExecutionResult::InvalidHandlerSignature => "invalid_handler_signature",
            ExecutionResult::HandlerFailed { .. } => "handler_failed",
        }
    }
}

impl From<Miss> for ExecutionResult {
    fn from(miss: Miss) -> Self {
        match miss {
            Miss::Host => ExecutionResult::HostNotFound,
            Miss::Route => ExecutionResult::RouteNotFound,
        }
    }
}

/// A URI already matched to its route
///
/// Resolved once per data source; invoked once per tenant with that tenant's
/// context.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    uri: String,
    route: Arc<Route>,
}

impl ResolvedRoute {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Bind `candidates` and run the handler
    #[instrument(
        name = "protocol_router_invoke",
        skip(self, candidates),
        fields(uri = %self.uri, candidates = candidates.len())
    )]
    pub async fn invoke(&self, candidates: &[ContextValue]) -> ExecutionResult {
        let Some(args) = self.route.bind(candidates) else {
            debug!(params = ?self.route.params(), "no candidate for a declared parameter");
            return ExecutionResult::InvalidHandlerSignature;
        };

        let route = Arc::clone(&self.route);
        let reply = match std::panic::catch_unwind(AssertUnwindSafe(|| route.call(args))) {
            Ok(reply) => reply,
            Err(panic) => return handler_panicked(&self.uri, panic),
        };

        let outcome: HandlerResult = match reply {
            HandlerReply::Ready(result) => result,
            HandlerReply::Deferred(future) => match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => return handler_panicked(&self.uri, panic),
            },
        };

        match outcome {
            Ok(Value::Object(payload)) => ExecutionResult::Success(payload),
            Ok(other) => {
                warn!(uri = %self.uri, kind = value_kind(&other), "handler returned a non-object payload");
                ExecutionResult::InvalidHandlerSignature
            }
            Err(e) => {
                warn!(uri = %self.uri, error = %e, "handler failed");
                ExecutionResult::HandlerFailed {
                    message: e.to_string(),
                }
            }
        }
    }
}

fn handler_panicked(uri: &str, panic: Box<dyn Any + Send>) -> ExecutionResult {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string());
    warn!(uri, message = %message, "handler panicked");
    ExecutionResult::HandlerFailed { message }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolver/dispatcher over a read-only route table
#[derive(Debug, Clone)]
pub struct ProtocolRouter {
    table: Arc<RouteTable>,
}

impl ProtocolRouter {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Match a URI against the route table
    ///
    /// The authority selects the host, the path segments walk its tree.
    /// A URI without an authority cannot name a host.
    pub fn resolve(&self, uri: &str) -> Result<ResolvedRoute, ExecutionResult> {
        let parsed = Url::parse(uri).map_err(|e| {
            debug!(uri, error = %e, "unparsable URI");
            ExecutionResult::HostNotFound
        })?;
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(ExecutionResult::HostNotFound)?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();

        let route = self
            .table
            .lookup(host, segments.iter().copied())
            .map_err(ExecutionResult::from)?;

        Ok(ResolvedRoute {
            uri: uri.to_string(),
            route,
        })
    }

    /// Resolve then invoke
    #[instrument(name = "protocol_router_execute", skip(self, candidates), fields(uri = %uri))]
    pub async fn execute(&self, uri: &str, candidates: &[ContextValue]) -> ExecutionResult {
        match self.resolve(uri) {
            Ok(resolved) => resolved.invoke(candidates).await,
            Err(miss) => {
                debug!(result = miss.label(), "route resolution failed");
                miss
            }
        }
    }
}

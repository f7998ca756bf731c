//! # Protocol Router
//!
//! In-process resolver for the `ddb://` symbolic protocol.
//!
//! Responsibilities:
//! - Hold the host → path-segment route tree, built once at startup
//! - Resolve a URI case-insensitively to a handler
//! - Bind caller-supplied context values to the handler's declared parameters
//! - Contain handler failures in an `ExecutionResult`
//!
//! # Example
//!
//! ```
//! use protocol_router::{ContextValue, ProtocolRouter};
//!
//! # futures::executor::block_on(async {
//! let router = ProtocolRouter::with_builtin_hosts().unwrap();
//! let now = ContextValue::Timestamp(chrono::Utc::now());
//! let result = router.execute("ddb://clock", &[now]).await;
//! assert!(result.is_success());
//! # });
//! ```

mod context;
mod error;
mod handler;
pub mod hosts;
mod router;
mod table;

pub use context::{bind, BoundArgs, ContextKind, ContextValue};
pub use error::{Result, RouterError};
pub use handler::{HandlerError, HandlerFn, HandlerReply, HandlerResult, Payload};
pub use router::{ExecutionResult, ProtocolRouter, ResolvedRoute};
pub use table::{Miss, Route, RouteTable, RouteTableBuilder};

impl ProtocolRouter {
    /// Router with the `guild` and `clock` hosts registered
    pub fn with_builtin_hosts() -> Result<Self> {
        let mut builder = RouteTable::builder();
        hosts::register_builtin(&mut builder)?;
        Ok(Self::new(builder.build()))
    }
}

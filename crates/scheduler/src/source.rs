//! Source fetcher - one resolution per data source per tick
//!
//! `http(s)` sources are fetched and parsed once; `ddb` sources are resolved
//! to a route once and invoked per tenant with that tenant's context.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use contracts::{ContractError, GuildHandle, ResourceFetcher, SourceUri, TenantSubscription};
use protocol_router::{ContextValue, ExecutionResult, ProtocolRouter, ResolvedRoute};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Result, SchedulerError};
use crate::selector::extract_value;

/// A data source ready to serve every tenant of its group
#[derive(Debug, Clone)]
pub enum SourceHandle {
    /// Parsed HTTP document shared by the group
    Document(Arc<Value>),
    /// Route resolved once, invoked per tenant
    Route(ResolvedRoute),
}

impl SourceHandle {
    /// `http` or `route`
    pub fn kind(&self) -> &'static str {
        match self {
            SourceHandle::Document(_) => "http",
            SourceHandle::Route(_) => "route",
        }
    }

    /// Value for one tenant
    ///
    /// Route handlers receive the guild, the subscription and the tick time
    /// as context; each binds the kinds it declares.
    ///
    /// # Errors
    /// - route invocation other than `Success`
    /// - selector failure
    pub async fn value_for(
        &self,
        subscription: &Arc<TenantSubscription>,
        guild: Arc<dyn GuildHandle>,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        match self {
            SourceHandle::Document(document) => extract_value(document, &subscription.selector),
            SourceHandle::Route(route) => {
                let candidates = [
                    ContextValue::Guild(guild),
                    ContextValue::Subscription(Arc::clone(subscription)),
                    ContextValue::Timestamp(now),
                ];
                match route.invoke(&candidates).await {
                    ExecutionResult::Success(payload) => {
                        extract_value(&Value::Object(payload), &subscription.selector)
                    }
                    other => Err(SchedulerError::RouteInvocation {
                        uri: route.uri().to_string(),
                        result: other.label(),
                        message: match other {
                            ExecutionResult::HandlerFailed { message } => message,
                            _ => String::new(),
                        },
                    }),
                }
            }
        }
    }
}

/// Turns a data-source URI into a [`SourceHandle`]
pub struct SourceFetcher<F> {
    fetcher: Arc<F>,
    router: Arc<ProtocolRouter>,
}

impl<F> SourceFetcher<F>
where
    F: ResourceFetcher + Sync,
{
    pub fn new(fetcher: Arc<F>, router: Arc<ProtocolRouter>) -> Self {
        Self { fetcher, router }
    }

    pub fn router(&self) -> &ProtocolRouter {
        &self.router
    }

    /// Resolve a source for the whole group
    ///
    /// # Errors
    /// - `RouteResolution` for an unknown host or path
    /// - `Contract(Fetch)` when the document is unreachable
    /// - `Contract(DocumentParse)` when the body is not JSON
    #[instrument(name = "scheduler_resolve_source", skip(self), fields(uri = %uri))]
    pub async fn resolve(&self, uri: &SourceUri) -> Result<SourceHandle> {
        if uri.is_internal() {
            let route = self
                .router
                .resolve(uri)
                .map_err(|miss| SchedulerError::RouteResolution {
                    uri: uri.to_string(),
                    result: miss.label(),
                })?;
            debug!("route resolved");
            return Ok(SourceHandle::Route(route));
        }

        let body = self.fetcher.fetch(uri).await?;
        let document: Value = serde_json::from_slice(&body)
            .map_err(|e| ContractError::document_parse(uri.as_str(), e.to_string()))?;
        debug!(bytes = body.len(), "document fetched");
        Ok(SourceHandle::Document(Arc::new(document)))
    }
}

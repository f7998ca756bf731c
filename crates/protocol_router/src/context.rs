//! Runtime context supplied by the caller, and type-directed binding
//!
//! A route declares an ordered list of `ContextKind`s. At dispatch the caller
//! hands over an unordered list of `ContextValue`s; each declared parameter
//! takes the first unused value its kind accepts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use contracts::{GuildHandle, TenantSubscription};

use crate::handler::HandlerError;

/// Declared parameter type of a route handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Live guild handle of the tenant being processed
    Guild,
    /// The tenant's subscription
    Subscription,
    /// Tick time
    Timestamp,
    /// Accepts a value of any kind
    Any,
}

impl ContextKind {
    /// Whether a supplied value can be bound to a parameter of this kind
    pub fn accepts(self, value: &ContextValue) -> bool {
        self == ContextKind::Any || self == value.kind()
    }
}

/// Context object supplied at dispatch time
#[derive(Debug, Clone)]
pub enum ContextValue {
    Guild(Arc<dyn GuildHandle>),
    Subscription(Arc<TenantSubscription>),
    Timestamp(DateTime<Utc>),
}

impl ContextValue {
    /// Concrete kind of this value
    pub fn kind(&self) -> ContextKind {
        match self {
            ContextValue::Guild(_) => ContextKind::Guild,
            ContextValue::Subscription(_) => ContextKind::Subscription,
            ContextValue::Timestamp(_) => ContextKind::Timestamp,
        }
    }
}

impl From<Arc<dyn GuildHandle>> for ContextValue {
    fn from(guild: Arc<dyn GuildHandle>) -> Self {
        ContextValue::Guild(guild)
    }
}

impl From<Arc<TenantSubscription>> for ContextValue {
    fn from(subscription: Arc<TenantSubscription>) -> Self {
        ContextValue::Subscription(subscription)
    }
}

impl From<DateTime<Utc>> for ContextValue {
    fn from(ts: DateTime<Utc>) -> Self {
        ContextValue::Timestamp(ts)
    }
}

/// Arguments bound to a handler, in declared parameter order
#[derive(Debug, Clone, Default)]
pub struct BoundArgs(Vec<ContextValue>);

impl BoundArgs {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContextValue> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContextValue> {
        self.0.iter()
    }

    /// Guild bound at `index`
    pub fn guild(&self, index: usize) -> Result<Arc<dyn GuildHandle>, HandlerError> {
        match self.get(index) {
            Some(ContextValue::Guild(guild)) => Ok(Arc::clone(guild)),
            other => Err(mismatch(index, ContextKind::Guild, other)),
        }
    }

    /// Subscription bound at `index`
    pub fn subscription(&self, index: usize) -> Result<Arc<TenantSubscription>, HandlerError> {
        match self.get(index) {
            Some(ContextValue::Subscription(sub)) => Ok(Arc::clone(sub)),
            other => Err(mismatch(index, ContextKind::Subscription, other)),
        }
    }

    /// Timestamp bound at `index`
    pub fn timestamp(&self, index: usize) -> Result<DateTime<Utc>, HandlerError> {
        match self.get(index) {
            Some(ContextValue::Timestamp(ts)) => Ok(*ts),
            other => Err(mismatch(index, ContextKind::Timestamp, other)),
        }
    }
}

fn mismatch(index: usize, expected: ContextKind, found: Option<&ContextValue>) -> HandlerError {
    match found {
        Some(value) => format!(
            "argument {index}: expected {expected:?}, found {:?}",
            value.kind()
        )
        .into(),
        None => format!("argument {index}: expected {expected:?}, found nothing").into(),
    }
}

/// Bind declared parameters against supplied candidates
///
/// Parameters are processed in declared order; each takes the first candidate
/// not yet consumed whose kind it accepts. Returns `None` as soon as one
/// parameter finds no candidate.
pub fn bind(params: &[ContextKind], candidates: &[ContextValue]) -> Option<BoundArgs> {
    let mut consumed = vec![false; candidates.len()];
    let mut bound = Vec::with_capacity(params.len());

    for kind in params {
        let index = candidates
            .iter()
            .enumerate()
            .position(|(i, value)| !consumed[i] && kind.accepts(value))?;
        consumed[index] = true;
        bound.push(candidates[index].clone());
    }

    Some(BoundArgs(bound))
}

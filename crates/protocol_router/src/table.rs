//! Route table
//!
//! Built once at startup and read-only afterwards. Each host owns a tree of
//! path segments; a node's leaf is the handler reached when the path ends at
//! that node (the root leaf is the host's default route). Host names and
//! segments are stored lower-cased so lookup is case-insensitive.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RouterError};
use crate::handler::{HandlerFn, HandlerReply};
use crate::{bind, BoundArgs, ContextKind, ContextValue};

/// A registered handler with its declared parameters
pub struct Route {
    host: String,
    path: String,
    params: Vec<ContextKind>,
    handler: HandlerFn,
}

impl Route {
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Normalized path (`""` for the host default route)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[ContextKind] {
        &self.params
    }

    /// Bind the declared parameters against the supplied candidates
    pub fn bind(&self, candidates: &[ContextValue]) -> Option<BoundArgs> {
        bind(&self.params, candidates)
    }

    /// Run the handler body (panics are not caught here)
    pub(crate) fn call(&self, args: BoundArgs) -> HandlerReply {
        (self.handler)(args)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("host", &self.host)
            .field("path", &self.path)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct RouteNode {
    children: HashMap<String, RouteNode>,
    leaf: Option<Arc<Route>>,
}

impl RouteNode {
    fn count(&self) -> usize {
        let own = usize::from(self.leaf.is_some());
        own + self.children.values().map(RouteNode::count).sum::<usize>()
    }
}

/// Why a URI did not resolve to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    Host,
    Route,
}

/// Immutable host → route tree mapping
#[derive(Debug, Default)]
pub struct RouteTable {
    hosts: HashMap<String, RouteNode>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Registered host names (lower-case)
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Total number of routes
    pub fn len(&self) -> usize {
        self.hosts.values().map(RouteNode::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Walk a host's tree segment by segment
    ///
    /// Empty segments (from `//` or a trailing `/`) are ignored.
    pub fn lookup<'a, I>(&self, host: &str, segments: I) -> std::result::Result<Arc<Route>, Miss>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = self
            .hosts
            .get(&host.to_ascii_lowercase())
            .ok_or(Miss::Host)?;

        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            node = node
                .children
                .get(&segment.to_ascii_lowercase())
                .ok_or(Miss::Route)?;
        }

        node.leaf.clone().ok_or(Miss::Route)
    }
}

/// Collects routes and validates them as they are registered
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    hosts: HashMap<String, RouteNode>,
}

impl RouteTableBuilder {
    /// Register a handler at `host` + `path`
    ///
    /// `path` is `/`-separated; `""` registers the host default route.
    ///
    /// # Errors
    /// - invalid host name or path segment
    /// - a route already registered at the same position
    /// - an `Any` parameter declared before another parameter
    pub fn route<F>(
        &mut self,
        host: &str,
        path: &str,
        params: &[ContextKind],
        handler: F,
    ) -> Result<&mut Self>
    where
        F: Fn(BoundArgs) -> HandlerReply + Send + Sync + 'static,
    {
        let host = normalize_host(host)?;
        let segments = normalize_path(&host, path)?;
        let path = segments.join("/");

        if let Some(index) = params
            .iter()
            .position(|kind| *kind == ContextKind::Any)
            .filter(|index| index + 1 < params.len())
        {
            return Err(RouterError::ShadowedParameter {
                host,
                path,
                index,
                kind: ContextKind::Any,
            });
        }

        let mut node = self.hosts.entry(host.clone()).or_default();
        for segment in &segments {
            node = node.children.entry(segment.clone()).or_default();
        }
        if node.leaf.is_some() {
            return Err(RouterError::DuplicateRoute { host, path });
        }

        node.leaf = Some(Arc::new(Route {
            host,
            path,
            params: params.to_vec(),
            handler: Arc::new(handler),
        }));
        Ok(self)
    }

    pub fn build(self) -> RouteTable {
        RouteTable { hosts: self.hosts }
    }
}

fn normalize_host(host: &str) -> Result<String> {
    let lower = host.trim().to_ascii_lowercase();
    let valid = !lower.is_empty()
        && lower
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if valid {
        Ok(lower)
    } else {
        Err(RouterError::InvalidHost {
            host: host.to_string(),
        })
    }
}

fn normalize_path(host: &str, path: &str) -> Result<Vec<String>> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split('/')
        .map(|segment| {
            if segment.is_empty() || segment.chars().any(char::is_whitespace) {
                Err(RouterError::InvalidSegment {
                    host: host.to_string(),
                    path: path.to_string(),
                    segment: segment.to_string(),
                })
            } else {
                Ok(segment.to_ascii_lowercase())
            }
        })
        .collect()
}

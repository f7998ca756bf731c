//! Selector evaluation over a fetched JSON document
//!
//! Selectors are JSONPath expressions (`$.count`, `$.stats[0].total`). A
//! selector must match exactly one node holding an integer that fits `i64`.

use serde_json::Value;
use serde_json_path::JsonPath;

use crate::error::{Result, SchedulerError};

/// Apply `selector` to `document`
///
/// # Errors
/// `Extract` when the selector does not parse, matches zero or several
/// nodes, or the node is not an integer (floats and strings included)
pub fn extract_value(document: &Value, selector: &str) -> Result<i64> {
    let path = JsonPath::parse(selector)
        .map_err(|e| SchedulerError::extract(selector, format!("invalid selector: {e}")))?;

    let nodes = path.query(document);
    let node = match nodes.len() {
        0 => return Err(SchedulerError::extract(selector, "no match")),
        1 => nodes.all()[0],
        n => return Err(SchedulerError::extract(selector, format!("{n} matches"))),
    };

    node.as_i64().ok_or_else(|| {
        SchedulerError::extract(selector, format!("expected an integer, found {node}"))
    })
}

//! SourceUri - Cheap-to-clone data source identifier
//!
//! Uses Arc<str> internally; it is the grouping key of a tick, so it gets
//! cloned once per subscription per tick.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Scheme of the in-process symbolic protocol
pub const INTERNAL_SCHEME: &str = "ddb";

/// Data source URI with cheap cloning.
///
/// Two subscriptions share a data source exactly when their URIs are
/// byte-identical, which is what groups them into one fetch per tick.
///
/// # Examples
/// ```
/// use contracts::SourceUri;
///
/// let uri: SourceUri = "ddb://guild/members/count".into();
/// assert!(uri.is_internal());
/// assert_eq!(uri.scheme(), Some("ddb"));
/// ```
#[derive(Clone, Default)]
pub struct SourceUri(Arc<str>);

impl SourceUri {
    /// Create a new SourceUri from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme part (before `://`), if any
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Whether the URI targets the in-process protocol router
    pub fn is_internal(&self) -> bool {
        self.scheme()
            .is_some_and(|s| s.eq_ignore_ascii_case(INTERNAL_SCHEME))
    }
}

impl Deref for SourceUri {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SourceUri {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SourceUri {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceUri {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for SourceUri {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for SourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceUri({:?})", self.0)
    }
}

impl PartialEq for SourceUri {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for SourceUri {}

impl PartialEq<str> for SourceUri {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for SourceUri {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

// Same as str hash so `HashMap<SourceUri, _>` can be queried with &str
impl Hash for SourceUri {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for SourceUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SourceUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_clone_is_cheap() {
        let a: SourceUri = "https://example.test/count".into();
        let b = a.clone();
        assert_eq!(a.as_str().as_ptr(), b.as_str().as_ptr());
    }

    #[test]
    fn test_scheme_detection() {
        assert!(SourceUri::from("DDB://guild").is_internal());
        assert!(!SourceUri::from("https://example.test").is_internal());
        assert_eq!(SourceUri::from("no-scheme").scheme(), None);
    }

    #[test]
    fn test_hashmap_key() {
        let mut map: HashMap<SourceUri, usize> = HashMap::new();
        map.insert("https://a.test".into(), 1);
        assert_eq!(map.get("https://a.test"), Some(&1));
    }

    #[test]
    fn test_serde() {
        let uri: SourceUri = "ddb://clock".into();
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, "\"ddb://clock\"");
        let parsed: SourceUri = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, uri);
    }
}

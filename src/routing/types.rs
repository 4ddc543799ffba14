//! Route table types and error definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Sentinel domain meaning "no explicit domain; match regardless of host".
///
/// A route authored with a literal domain named `"_"` is indistinguishable
/// from a domain-less route. This collision is a documented property of the
/// key grammar, not resolved here.
pub const DOMAIN_ANY: &str = "_";

/// The routermap file as parsed: raw route key → descriptor value,
/// in author order.
pub type RawRouteMap = serde_json::Map<String, Value>;

/// Errors raised while building the route table.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A non-empty route key contained no `/` separator, so no
    /// domain/path split exists for it.
    #[error("malformed route key {key:?}: no '/' separator")]
    MalformedKey { key: String },

    /// A route value could not be read as a descriptor object.
    #[error("invalid descriptor for route key {key:?}")]
    InvalidDescriptor {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The value associated with a route key.
///
/// Only `views` is meaningful to the builder (it is the one field the
/// domain-prefix rewrite touches); everything else the author put on the
/// route is carried through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Template path for the route, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,

    /// Remaining descriptor fields (handler references, flags), untouched.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

impl Descriptor {
    /// Descriptor with only a `views` field, mainly for tests and fixtures.
    pub fn with_views(views: impl Into<String>) -> Self {
        Self {
            views: Some(views.into()),
            rest: serde_json::Map::new(),
        }
    }
}

/// Normalized two-level route lookup: path → domain → descriptor.
///
/// Every path present has at least one domain entry; domains within a path
/// are unique. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: HashMap<String, HashMap<String, Descriptor>>,
}

impl RouteTable {
    pub(crate) fn insert(&mut self, path: String, domain: String, descriptor: Descriptor) {
        self.routes.entry(path).or_default().insert(domain, descriptor);
    }

    /// Look up the descriptor for a request path and host.
    ///
    /// The path is normalized with a trailing `/` before lookup. The host
    /// is tried literally first, then the `"_"` sentinel.
    pub fn get(&self, path: &str, host: &str) -> Option<&Descriptor> {
        let domains = if path.ends_with('/') {
            self.routes.get(path)?
        } else {
            self.routes.get(&format!("{path}/"))?
        };
        domains.get(host).or_else(|| domains.get(DOMAIN_ANY))
    }

    /// All domain entries registered for a normalized path.
    pub fn domains(&self, path: &str) -> Option<&HashMap<String, Descriptor>> {
        self.routes.get(path)
    }

    /// Number of distinct paths in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over (path, domain map) entries. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &HashMap<String, Descriptor>)> {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut t = RouteTable::default();
        t.insert("/foo/".into(), "example.com".into(), Descriptor::with_views("example.com/foo"));
        t.insert("/foo/".into(), DOMAIN_ANY.into(), Descriptor::with_views("/fallback"));
        t.insert("/bar/".into(), DOMAIN_ANY.into(), Descriptor::with_views("/bar"));
        t
    }

    #[test]
    fn test_get_prefers_literal_host() {
        let t = table();
        let d = t.get("/foo/", "example.com").unwrap();
        assert_eq!(d.views.as_deref(), Some("example.com/foo"));
    }

    #[test]
    fn test_get_falls_back_to_sentinel() {
        let t = table();
        let d = t.get("/foo/", "other.com").unwrap();
        assert_eq!(d.views.as_deref(), Some("/fallback"));

        let d = t.get("/bar/", "example.com").unwrap();
        assert_eq!(d.views.as_deref(), Some("/bar"));
    }

    #[test]
    fn test_get_normalizes_trailing_slash() {
        let t = table();
        assert!(t.get("/bar", "any.host").is_some());
        assert!(t.get("/missing", "any.host").is_none());
    }

    #[test]
    fn test_descriptor_keeps_unknown_fields() {
        let d: Descriptor =
            serde_json::from_value(serde_json::json!({"views": "/x", "cgi": "handler"})).unwrap();
        assert_eq!(d.views.as_deref(), Some("/x"));
        assert_eq!(d.rest.get("cgi").unwrap(), "handler");
    }
}

//! Route descriptors and the descriptor normalizer.
//!
//! A [`RouteDescriptor`] is both a table-time value (a declared route) and a
//! request-time value (a navigation target). Navigation entry points accept
//! anything convertible into a [`NavigationTarget`] and run it through
//! [`normalize`] to obtain a canonical descriptor.

use serde::{Deserialize, Serialize};

use miniroute_core::Query;
use miniroute_host::{ExtraOptions, NavigateKind};

/// A route, either as declared in the route table or as requested by a
/// navigation call.
///
/// A matched descriptor is always a value copy, never an alias into the
/// route table; the table is read-only after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteDescriptor {
    /// The route path. Declared without a leading slash; requests may carry
    /// one and may embed a query string after `?`.
    pub path: String,
    /// Optional identifier for name-based matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Compatibility alias for `path`, promoted by the normalizer when
    /// `path` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The requested path including its raw query string, set during
    /// matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    /// Query parameters.
    #[serde(skip_serializing_if = "Query::is_empty")]
    pub query: Query,
    /// The navigation primitive this descriptor targets.
    #[serde(rename = "navigationType")]
    pub kind: NavigateKind,
    /// For back navigation, the number of pages to pop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<usize>,
    /// Pass-through options forwarded verbatim to the host primitive.
    #[serde(skip_serializing_if = "ExtraOptions::is_empty")]
    pub extra: ExtraOptions,
    /// Marks a descriptor synthesized from a host lifecycle event rather
    /// than an explicit API call. The dispatcher treats these as a no-op
    /// host call while still updating route meta and running guards.
    #[serde(skip)]
    pub host_originated: bool,
}

impl RouteDescriptor {
    /// Creates a descriptor targeting the given path.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Creates a descriptor targeting the route with the given name.
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// Options for a back navigation.
#[derive(Debug, Clone, Default)]
pub struct BackOptions {
    /// The number of pages to pop. Defaults to 1.
    pub delta: Option<usize>,
    /// Pass-through options forwarded verbatim to the host primitive.
    pub extra: ExtraOptions,
}

impl BackOptions {
    /// Creates back options popping `delta` pages.
    pub fn with_delta(delta: usize) -> Self {
        Self {
            delta: Some(delta),
            ..Self::default()
        }
    }
}

/// A navigation target: a bare path string or a partial descriptor.
#[derive(Debug, Clone)]
pub enum NavigationTarget {
    /// A bare path, possibly with an embedded query string.
    Path(String),
    /// A partial descriptor.
    Descriptor(RouteDescriptor),
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<RouteDescriptor> for NavigationTarget {
    fn from(descriptor: RouteDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// Coerces a navigation target into a canonical descriptor.
///
/// Strings become the descriptor's path unchanged. If a descriptor carries
/// a `url` but no `path`, the `url` is promoted to `path`. The navigation
/// type keeps its default (`navigateTo`) unless the descriptor set one.
pub fn normalize(target: NavigationTarget) -> RouteDescriptor {
    match target {
        NavigationTarget::Path(path) => RouteDescriptor::for_path(path),
        NavigationTarget::Descriptor(mut descriptor) => {
            if descriptor.path.is_empty() {
                if let Some(url) = descriptor.url.take() {
                    descriptor.path = url;
                }
            }
            descriptor
        }
    }
}

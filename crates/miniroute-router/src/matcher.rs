//! The route matcher.
//!
//! Resolves a [`MatchRequest`] to a route-table entry, producing an
//! independent copy merged with request-supplied query and full-path
//! overrides. Matching is a pure function over its inputs and the table;
//! returning `None` is not itself an error — navigation entry points
//! convert an unmatched "to" into [`RouterError::NotFound`](miniroute_core::RouterError).

use miniroute_core::{query, Query};

use crate::descriptor::RouteDescriptor;
use crate::table::RouteTable;

/// The home path sentinel.
pub const HOME_PATH: &str = "/";
/// The empty path sentinel, equivalent to [`HOME_PATH`].
pub const EMPTY_PATH: &str = "";
/// Reserved route name for the not-found fallback entry, compared
/// case-insensitively.
pub const NOT_FOUND_ROUTE_NAME: &str = "notfound";

/// A matching request: an optional path (possibly with an embedded query
/// string), an optional name, and an optional explicit query mapping.
#[derive(Debug, Clone, Default)]
pub struct MatchRequest {
    /// The requested path. `None` for name-only requests.
    pub path: Option<String>,
    /// The requested route name.
    pub name: Option<String>,
    /// Explicitly supplied query parameters; these win over parameters
    /// embedded in the path on key collisions.
    pub query: Option<Query>,
}

impl MatchRequest {
    /// Creates a path-only match request.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Resolves a request against the table.
///
/// The scan selects the first entry for which one of the following holds,
/// in order:
///
/// 1. The requested path equals the home sentinel (`"/"` or `""`) — in
///    which case *any* entry satisfies the condition, so the first
///    declared route is selected regardless of its own path. Home-path
///    resolution is "first declared route", not "route whose path is
///    empty".
/// 2. A name was requested and the entry's name equals it.
/// 3. The entry's path equals the requested path, each with a leading
///    slash stripped.
///
/// If no entry matches, the scan retries looking for an entry whose name
/// case-insensitively equals [`NOT_FOUND_ROUTE_NAME`]. The returned
/// descriptor is an independent copy of the entry with the request's
/// query merged over any query string embedded in the path (explicit
/// keys win) and `full_path` set to the raw requested path.
pub fn match_route(table: &RouteTable, request: &MatchRequest) -> Option<RouteDescriptor> {
    let mut overlay_query = Query::new();
    let mut full_path = None;
    let mut path = request.path.clone();

    if let Some(raw) = request.path.as_deref() {
        full_path = Some(raw.to_string());
        if let Some((path_part, query_part)) = raw.split_once('?') {
            path = Some(path_part.to_string());
            overlay_query = query::parse(query_part);
        }
    }

    if let Some(explicit) = &request.query {
        overlay_query = query::merged(&overlay_query, explicit);
    }

    let selected = table
        .entries()
        .iter()
        .find(|entry| selects(entry, path.as_deref(), request.name.as_deref()))
        .or_else(|| {
            table.entries().iter().find(|entry| {
                entry
                    .name
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(NOT_FOUND_ROUTE_NAME))
            })
        })?;

    let mut matched = selected.clone();
    matched.query = overlay_query;
    if let Some(full_path) = full_path {
        matched.full_path = Some(full_path);
    }
    Some(matched)
}

/// The per-entry selection condition of the primary scan.
fn selects(entry: &RouteDescriptor, path: Option<&str>, name: Option<&str>) -> bool {
    // Home sentinel: any entry satisfies, so the first declared route wins.
    if matches!(path, Some(HOME_PATH | EMPTY_PATH)) {
        return true;
    }

    if let Some(name) = name {
        return entry.name.as_deref() == Some(name);
    }

    path.is_some_and(|path| {
        let requested = path.strip_prefix('/').unwrap_or(path);
        entry.path.strip_prefix('/').unwrap_or(&entry.path) == requested
    })
}

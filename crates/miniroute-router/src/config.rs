//! Router construction options.
//!
//! [`RouterConfig`] matches the host ecosystem's JSON page configuration,
//! so a config blob (the app's page manifest) deserializes straight into
//! it.

use serde::{Deserialize, Serialize};

use miniroute_host::NavigateKind;

use crate::descriptor::RouteDescriptor;

/// A namespaced sub-package of routes.
///
/// Each page path is declared relative to the package and rewritten to
/// `{root}/{path}` when the route table is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubPackage {
    /// The namespace root prefixed onto every page path.
    pub root: String,
    /// The package's page routes.
    pub pages: Vec<RouteDescriptor>,
}

/// Options for constructing a [`Router`](crate::Router).
///
/// # Examples
///
/// ```
/// use miniroute_router::RouterConfig;
///
/// let config: RouterConfig = serde_json::from_str(
///     r#"{
///         "routes": [{"path": "pages/index/index"}],
///         "subPackages": [{"root": "shop", "pages": [{"path": "cart/index"}]}]
///     }"#,
/// ).unwrap();
/// assert_eq!(config.routes.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    /// The primary route list, in declaration order.
    pub routes: Vec<RouteDescriptor>,
    /// Namespaced sub-package route lists, appended after the primary list.
    pub sub_packages: Vec<SubPackage>,
    /// Whitelist of navigation types the dispatcher accepts.
    /// Defaults to all five canonical types.
    pub navigation_types: Option<Vec<NavigateKind>>,
}

impl RouterConfig {
    /// Creates a config with the given primary routes and defaults
    /// everywhere else.
    pub fn with_routes(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    /// Returns the allowed navigation types, defaulting to all five.
    pub fn allowed_kinds(&self) -> Vec<NavigateKind> {
        self.navigation_types
            .clone()
            .unwrap_or_else(|| NavigateKind::ALL.to_vec())
    }
}

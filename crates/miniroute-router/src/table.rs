//! The route table builder.
//!
//! Flattens a primary route list and namespaced sub-package route lists
//! into one immutable ordered sequence at router construction time.
//! Lookup order over the sequence is significant: the first structurally
//! matching entry wins ties, so later duplicates are simply unreachable.

use crate::config::SubPackage;
use crate::descriptor::RouteDescriptor;

/// An immutable, ordered sequence of declared routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// Builds the table from the primary route list followed by each
    /// sub-package's pages with their paths rewritten to `{root}/{path}`.
    ///
    /// No duplicate validation is performed; malformed input degrades to
    /// an incomplete table surfaced later as "route not found".
    pub fn build(routes: Vec<RouteDescriptor>, sub_packages: &[SubPackage]) -> Self {
        let mut entries = routes;

        for package in sub_packages {
            for page in &package.pages {
                let mut entry = page.clone();
                entry.path = format!("{}/{}", package.root, page.path);
                entries.push(entry);
            }
        }

        Self { entries }
    }

    /// Returns the table entries in declaration order.
    pub fn entries(&self) -> &[RouteDescriptor] {
        &self.entries
    }

    /// Returns the first declared route, if any.
    pub fn first(&self) -> Option<&RouteDescriptor> {
        self.entries.first()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

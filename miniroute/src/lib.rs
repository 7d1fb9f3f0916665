//! # miniroute
//!
//! A guarded page router for embedded host runtimes.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. You can depend on `miniroute` to get the whole router, or
//! depend on individual crates for finer-grained control.

/// Core types: error types, query codec, and logging.
pub use miniroute_core as core;

/// The host-runtime boundary: navigation primitives and lifecycle hooks.
pub use miniroute_host as host;

/// The router core: table, matcher, guards, dispatcher, and route meta.
pub use miniroute_router as router;

// Re-export the types most applications need at the crate root.
pub use miniroute_core::{Query, RouterError, RouterResult};
pub use miniroute_host::{
    Completion, HostApplication, HostRuntime, LifecycleHooks, LifecycleScope, NavigateKind,
    NavigateRequest, PageHandle,
};
pub use miniroute_router::{
    BackOptions, NavigationTarget, RouteDescriptor, RouteMeta, Router, RouterConfig, SubPackage,
};

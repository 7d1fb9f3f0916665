//! # miniroute-router
//!
//! The miniroute router core: route table, matcher, guard pipeline,
//! dispatcher, and the route-meta synchronizer that keeps the router's
//! record of the current route consistent with the host's actual page
//! stack.
//!
//! ## Modules
//!
//! - [`config`] - Router construction options
//! - [`descriptor`] - Route descriptors and the normalizer
//! - [`table`] - The route table builder
//! - [`matcher`] - Descriptor-to-table resolution
//! - [`guards`] - The pre/post navigation guard pipeline
//! - [`dispatch`] - Mapping to host primitives and URL building
//! - [`meta`] - Route meta and the synchronization state machine
//! - [`router`] - The public [`Router`] type

pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod guards;
pub mod matcher;
pub mod meta;
pub mod router;
pub mod table;

// Re-export the most commonly used types at the crate root.
pub use config::{RouterConfig, SubPackage};
pub use descriptor::{BackOptions, NavigationTarget, RouteDescriptor};
pub use guards::{AfterGuard, BeforeGuard, GuardOutcome, Next};
pub use matcher::{MatchRequest, NOT_FOUND_ROUTE_NAME};
pub use meta::{LaunchPhase, RouteMeta, SyncState};
pub use router::{Router, MAX_REDIRECT_HOPS};
pub use table::RouteTable;

//! # miniroute-core
//!
//! Core types for the miniroute router. This crate has no dependency on the
//! host-runtime boundary or the router itself and provides the foundation for
//! all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`query`] - Query-string codec and merge helpers
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod query;

// Re-export the most commonly used types at the crate root.
pub use error::{RouterError, RouterResult};
pub use query::Query;

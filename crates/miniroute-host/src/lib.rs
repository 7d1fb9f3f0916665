//! # miniroute-host
//!
//! The host-runtime boundary for the miniroute router. The surrounding
//! application environment (the "host") owns the real page stack and the
//! navigation primitives; this crate gives that environment a typed
//! interface the router can drive without knowing the host's identity.
//!
//! ## Modules
//!
//! - [`runtime`] - Navigation primitives, the page stack, and completion handles
//! - [`lifecycle`] - Lifecycle events fired by the host outside router control

pub mod lifecycle;
pub mod runtime;

// Re-export the most commonly used types at the crate root.
pub use lifecycle::{HostApplication, LaunchOptions, LifecycleHooks, LifecycleScope, ShowOptions};
pub use runtime::{
    Completion, CompletionSignal, ExtraOptions, HostRuntime, NavigateKind, NavigateRequest,
    PageHandle,
};

//! Page-lifecycle events fired by the host outside router control.
//!
//! The host application shell and each displayed page emit launch, load,
//! and show events on their own schedule (cold launch, system back-swipe,
//! tab-bar taps). A router registers a [`LifecycleHooks`] implementation
//! through [`HostApplication::attach_lifecycle`] to observe them.

use std::sync::Arc;

use async_trait::async_trait;

use miniroute_core::Query;

/// The context a "show" event fires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleScope {
    /// The full application shell became visible.
    App,
    /// An individual page became visible.
    Page,
}

/// Parameters the host supplies with the application "launch" event.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Query parameters the application was launched with.
    pub query: Query,
}

/// Parameters the host supplies with a "show" event.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Query parameters, present for app-scope show events.
    pub query: Option<Query>,
}

/// Listener for the three host lifecycle events.
///
/// The host awaits each hook before continuing its own lifecycle
/// processing, so a hook may itself issue navigations.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// The application launched with the given options.
    async fn on_launch(&self, options: LaunchOptions);

    /// A page loaded with the given parameters.
    async fn on_load(&self, params: Query);

    /// The application shell or a page became visible.
    async fn on_show(&self, scope: LifecycleScope, options: ShowOptions);
}

/// The host application's lifecycle registration point.
///
/// Implementations wire the given hooks into the host's own launch, load,
/// and show callbacks.
pub trait HostApplication {
    /// Installs lifecycle hooks onto the host application.
    fn attach_lifecycle(&self, hooks: Arc<dyn LifecycleHooks>);
}

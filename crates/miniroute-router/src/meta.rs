//! The shared current/previous route record and the synchronization state
//! machine.
//!
//! [`RouteMeta`] has two independent writers: router-driven navigation and
//! host lifecycle callbacks. [`SyncState`] carries the two flags that keep
//! them from feeding back into each other: whether the application has
//! observed its first page "show", and whether an explicit API navigation
//! is currently in flight. Both live on the router instance; there is no
//! module-level singleton.

use crate::descriptor::RouteDescriptor;

/// The shared current ("to") and previous ("from") resolved routes.
///
/// Created once at router construction and mutated in place for the
/// lifetime of the application. Write points: after matching "to", after
/// matching "from", and during lifecycle-driven reconciliation.
#[derive(Debug, Clone, Default)]
pub struct RouteMeta {
    /// The route the router most recently resolved to.
    pub to: Option<RouteDescriptor>,
    /// The route that was current before the last navigation.
    pub from: Option<RouteDescriptor>,
}

/// Whether the application has observed its first page "show" event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    /// No page has been shown yet.
    PreLaunch,
    /// At least one page "show" has been observed.
    Launched,
}

/// The reconciliation state machine of a router instance.
///
/// Transitions:
///
/// - [`begin_api_navigation`](SyncState::begin_api_navigation) — an
///   explicit API call is about to resolve and dispatch; corrective
///   re-sync is suppressed until the next "show".
/// - [`observe_show`](SyncState::observe_show) — a page "show" event was
///   processed; the application counts as launched and the API flag is
///   cleared.
#[derive(Debug, Clone)]
pub struct SyncState {
    phase: LaunchPhase,
    api_navigation: bool,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncState {
    /// Creates the initial pre-launch state.
    pub const fn new() -> Self {
        Self {
            phase: LaunchPhase::PreLaunch,
            api_navigation: false,
        }
    }

    /// Returns the current launch phase.
    pub const fn phase(&self) -> LaunchPhase {
        self.phase
    }

    /// Returns `true` while an explicit API navigation is in flight.
    pub const fn api_navigation_in_flight(&self) -> bool {
        self.api_navigation
    }

    /// Marks the start of an explicit API navigation.
    pub fn begin_api_navigation(&mut self) {
        self.api_navigation = true;
    }

    /// Records a processed page "show" event.
    pub fn observe_show(&mut self) {
        self.phase = LaunchPhase::Launched;
        self.api_navigation = false;
    }

    /// Returns `true` if a page "show" event should issue a corrective
    /// host-originated navigation.
    ///
    /// Before the first "show" any non-API show reconciles, letting the
    /// cold-launch route land in [`RouteMeta`]. Afterwards only a path
    /// divergence between the host's displayed page and the recorded "to"
    /// route does.
    pub const fn should_reconcile(&self, path_differs: bool) -> bool {
        match self.phase {
            LaunchPhase::PreLaunch => !self.api_navigation,
            LaunchPhase::Launched => !self.api_navigation && path_differs,
        }
    }
}

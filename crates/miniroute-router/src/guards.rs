//! The guard pipeline.
//!
//! Pre-navigation guards are invoked *concurrently*, not in sequence: every
//! guard is issued back-to-back with its own single-use [`Next`] handle, and
//! the pipeline joins all outcomes before dispatch. Independent guards (auth
//! check, analytics, feature flag) therefore run without head-of-line
//! blocking, at the cost of no defined ordering between guards' side
//! effects. Implementers used to sequential middleware should not rely on
//! one guard observing another's writes.
//!
//! A guard that needs to do asynchronous work moves its [`Next`] into a
//! spawned task:
//!
//! ```
//! use miniroute_router::guards::Next;
//! use miniroute_router::RouteDescriptor;
//!
//! # fn register(f: impl Fn(RouteDescriptor, RouteDescriptor, Next) + Send + Sync) {}
//! register(|to, _from, next| {
//!     tokio::spawn(async move {
//!         let authorized = to.path != "pages/admin/index";
//!         next.allow(authorized);
//!     });
//! });
//! ```
//!
//! Post-navigation observers run only after a successful dispatch; each
//! observer's failure is logged and isolated, never affecting siblings or
//! the caller.

use std::sync::Arc;

use futures::future;
use tokio::sync::oneshot;

use miniroute_core::{RouterError, RouterResult};

use crate::descriptor::RouteDescriptor;

/// A pre-navigation interceptor.
///
/// Receives the matched "to" and "from" descriptors and a single-use
/// [`Next`] handle it must eventually resolve.
pub type BeforeGuard = Arc<dyn Fn(RouteDescriptor, RouteDescriptor, Next) + Send + Sync>;

/// A post-navigation observer. Fire-and-forget; errors are isolated.
pub type AfterGuard = Arc<dyn Fn(&RouteDescriptor, &RouteDescriptor) -> RouterResult<()> + Send + Sync>;

/// What a guard resolved its [`Next`] with.
#[derive(Debug)]
enum NextValue {
    Proceed,
    Allow(bool),
    Redirect(RouteDescriptor),
    RedirectPath(String),
}

/// Single-use completion handle passed to each pre-navigation guard.
///
/// Every method consumes the handle; dropping it without resolving fails
/// the pipeline with an invalid-guard error.
#[derive(Debug)]
pub struct Next {
    tx: oneshot::Sender<NextValue>,
}

impl Next {
    /// Approves the navigation with no redirect.
    pub fn proceed(self) {
        let _ = self.tx.send(NextValue::Proceed);
    }

    /// Approves (`true`) or denies (`false`) the navigation.
    pub fn allow(self, allowed: bool) {
        let _ = self.tx.send(NextValue::Allow(allowed));
    }

    /// Substitutes a different navigation target.
    pub fn redirect(self, route: RouteDescriptor) {
        let _ = self.tx.send(NextValue::Redirect(route));
    }

    /// Substitutes a different navigation target by path.
    pub fn redirect_path(self, path: impl Into<String>) {
        let _ = self.tx.send(NextValue::RedirectPath(path.into()));
    }
}

/// A single guard's aggregated outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// The guard approved the navigation as requested.
    Approved,
    /// The guard substituted a different target, to be navigated after the
    /// original dispatch succeeds.
    Redirect(RouteDescriptor),
}

/// Runs every pre-navigation guard concurrently and joins the outcomes.
///
/// All guards are issued before any outcome is awaited. If any guard
/// denies or resolves invalidly, the whole step fails and the navigation
/// does not proceed; otherwise the outcomes are returned in guard
/// registration order.
pub(crate) async fn run_before(
    guards: &[BeforeGuard],
    to: &RouteDescriptor,
    from: &RouteDescriptor,
) -> RouterResult<Vec<GuardOutcome>> {
    let signals: Vec<oneshot::Receiver<NextValue>> = guards
        .iter()
        .map(|guard| {
            let (tx, rx) = oneshot::channel();
            guard(to.clone(), from.clone(), Next { tx });
            rx
        })
        .collect();

    future::try_join_all(signals.into_iter().map(|signal| async move {
        match signal.await {
            Ok(NextValue::Proceed | NextValue::Allow(true)) => Ok(GuardOutcome::Approved),
            Ok(NextValue::Allow(false)) => Err(RouterError::Aborted),
            Ok(NextValue::Redirect(route)) => Ok(GuardOutcome::Redirect(route)),
            Ok(NextValue::RedirectPath(path)) => {
                Ok(GuardOutcome::Redirect(RouteDescriptor::for_path(path)))
            }
            Err(_) => Err(RouterError::InvalidGuard(
                "guard dropped its completion handle without resolving".to_string(),
            )),
        }
    }))
    .await
}

/// Runs every post-navigation observer, isolating failures.
pub(crate) fn run_after(guards: &[AfterGuard], to: &RouteDescriptor, from: &RouteDescriptor) {
    for guard in guards {
        if let Err(error) = guard(to, from) {
            tracing::warn!(code = error.code(), %error, "after-guard failed");
        }
    }
}

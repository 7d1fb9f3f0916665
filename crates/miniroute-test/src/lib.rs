//! # miniroute-test
//!
//! Testing utilities for the miniroute router. Provides [`TestHost`], a
//! scripted in-memory host runtime that records every primitive
//! invocation, simulates the page stack the way a real host would, and
//! lets tests fire lifecycle events at the attached router.
//!
//! ## Usage
//!
//! ```
//! use miniroute_test::TestHost;
//! use miniroute_host::{HostRuntime, NavigateKind, NavigateRequest, Completion};
//!
//! # async fn example() {
//! let host = TestHost::new();
//! host.seed_stack(&["pages/index/index"]);
//!
//! let (completion, signal) = Completion::channel();
//! host.invoke(
//!     NavigateKind::NavigateTo,
//!     NavigateRequest { url: "/pages/detail/index?id=7".to_string(), ..NavigateRequest::default() },
//!     completion,
//! );
//! signal.await.unwrap().unwrap();
//!
//! assert_eq!(host.page_stack().len(), 2);
//! assert_eq!(host.calls().len(), 1);
//! # }
//! ```

use std::sync::{Arc, Mutex};

use miniroute_core::Query;
use miniroute_host::{
    Completion, HostApplication, HostRuntime, LaunchOptions, LifecycleHooks, LifecycleScope,
    NavigateKind, NavigateRequest, PageHandle, ShowOptions,
};

/// A recorded host primitive invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The primitive that was invoked.
    pub kind: NavigateKind,
    /// The request it received.
    pub request: NavigateRequest,
}

/// A scripted in-memory host runtime.
///
/// Successful invocations mutate the simulated page stack the way the
/// real host primitives would: `navigateTo` pushes, `redirectTo` replaces
/// the top, `switchTab`/`reLaunch` reset the stack, and `navigateBack`
/// pops. Tests can also mutate the stack directly to simulate host-driven
/// navigation the router never sees.
#[derive(Default)]
pub struct TestHost {
    calls: Mutex<Vec<RecordedCall>>,
    stack: Mutex<Vec<PageHandle>>,
    fail_next: Mutex<Option<String>>,
    hooks: Mutex<Option<Arc<dyn LifecycleHooks>>>,
}

impl TestHost {
    /// Creates a host with an empty page stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the page stack with pages at the given route paths.
    pub fn seed_stack(&self, paths: &[&str]) {
        let pages = paths
            .iter()
            .map(|path| PageHandle::new(*path, format!("/{path}")))
            .collect();
        *self.stack.lock().expect("test host lock poisoned") = pages;
    }

    /// Replaces the page stack with the given handles.
    ///
    /// Use this to simulate a host-driven navigation, e.g. a back-swipe
    /// that popped a page without the router's involvement.
    pub fn set_stack(&self, pages: Vec<PageHandle>) {
        *self.stack.lock().expect("test host lock poisoned") = pages;
    }

    /// Makes the next invocation fail with the given message.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.lock().expect("test host lock poisoned") = Some(message.into());
    }

    /// Returns every recorded invocation, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("test host lock poisoned").clone()
    }

    /// Returns the kinds of every recorded invocation, in order.
    pub fn call_kinds(&self) -> Vec<NavigateKind> {
        self.calls().into_iter().map(|call| call.kind).collect()
    }

    /// Fires the application "launch" event at the attached hooks.
    pub async fn fire_launch(&self, query: Query) {
        self.hooks().on_launch(LaunchOptions { query }).await;
    }

    /// Fires a page "load" event at the attached hooks.
    pub async fn fire_load(&self, params: Query) {
        self.hooks().on_load(params).await;
    }

    /// Fires a "show" event at the attached hooks.
    pub async fn fire_show(&self, scope: LifecycleScope, query: Option<Query>) {
        self.hooks().on_show(scope, ShowOptions { query }).await;
    }

    fn hooks(&self) -> Arc<dyn LifecycleHooks> {
        self.hooks
            .lock()
            .expect("test host lock poisoned")
            .clone()
            .expect("no lifecycle hooks attached")
    }

    /// Applies a successful invocation's stack effect.
    fn apply(&self, kind: NavigateKind, request: &NavigateRequest) {
        let mut stack = self.stack.lock().expect("test host lock poisoned");

        match kind {
            NavigateKind::NavigateTo => stack.push(page_from_url(&request.url)),
            NavigateKind::RedirectTo => {
                stack.pop();
                stack.push(page_from_url(&request.url));
            }
            NavigateKind::SwitchTab | NavigateKind::ReLaunch => {
                *stack = vec![page_from_url(&request.url)];
            }
            NavigateKind::NavigateBack => {
                let delta = request.delta.unwrap_or(1);
                let keep = stack.len().saturating_sub(delta).max(1);
                stack.truncate(keep);
            }
        }
    }
}

impl HostRuntime for TestHost {
    fn invoke(&self, kind: NavigateKind, request: NavigateRequest, completion: Completion) {
        self.calls
            .lock()
            .expect("test host lock poisoned")
            .push(RecordedCall {
                kind,
                request: request.clone(),
            });

        let scripted_failure = self
            .fail_next
            .lock()
            .expect("test host lock poisoned")
            .take();

        if let Some(message) = scripted_failure {
            completion.fail(message);
        } else {
            self.apply(kind, &request);
            completion.succeed();
        }
    }

    fn page_stack(&self) -> Vec<PageHandle> {
        self.stack.lock().expect("test host lock poisoned").clone()
    }
}

impl HostApplication for TestHost {
    fn attach_lifecycle(&self, hooks: Arc<dyn LifecycleHooks>) {
        *self.hooks.lock().expect("test host lock poisoned") = Some(hooks);
    }
}

/// Derives a page handle from a navigation URL.
fn page_from_url(url: &str) -> PageHandle {
    let without_slash = url.strip_prefix('/').unwrap_or(url);
    let path = without_slash.split('?').next().unwrap_or(without_slash);
    PageHandle::new(path, url)
}

//! The router: public navigation operations, the redirect trampoline, and
//! the lifecycle hooks that reconcile route meta with the host.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tracing::Instrument;

use miniroute_core::{logging, query, Query, RouterError, RouterResult};
use miniroute_host::{
    HostApplication, HostRuntime, LaunchOptions, LifecycleHooks, LifecycleScope, NavigateKind,
    ShowOptions,
};

use crate::config::RouterConfig;
use crate::descriptor::{self, BackOptions, NavigationTarget, RouteDescriptor};
use crate::dispatch;
use crate::guards::{self, AfterGuard, BeforeGuard, GuardOutcome, Next};
use crate::matcher::{self, MatchRequest};
use crate::meta::{RouteMeta, SyncState};
use crate::table::RouteTable;

/// Hard cap on chained redirect depth.
///
/// A guard that unconditionally redirects to a ping-ponging target would
/// otherwise recurse without bound; hops past the cap are dropped and
/// logged.
pub const MAX_REDIRECT_HOPS: usize = 8;

/// The virtual router over a host runtime.
///
/// Cheap to clone; clones share the route table, guards, and route meta.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use miniroute_router::{Router, RouterConfig, RouteDescriptor};
/// use miniroute_test::TestHost;
///
/// # async fn example() {
/// let host = Arc::new(TestHost::new());
/// let config = RouterConfig::with_routes(vec![
///     RouteDescriptor::for_path("pages/index/index"),
///     RouteDescriptor::for_path("pages/detail/index"),
/// ]);
/// let router = Router::from_config(config, host);
///
/// router.before_each(|_to, _from, next| next.proceed());
/// router.navigate_to("/pages/detail/index").await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    table: RouteTable,
    allowed: Vec<NavigateKind>,
    host: Arc<dyn HostRuntime>,
    meta: Mutex<RouteMeta>,
    state: Mutex<SyncState>,
    before: RwLock<Vec<BeforeGuard>>,
    after: RwLock<Vec<AfterGuard>>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.table.len())
            .field("allowed", &self.inner.allowed)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Builds a router over the given host runtime.
    ///
    /// The route table is flattened once here and is read-only afterwards.
    /// Malformed config degrades to an incomplete table, surfaced later as
    /// "route not found".
    pub fn from_config(config: RouterConfig, host: Arc<dyn HostRuntime>) -> Self {
        let allowed = config.allowed_kinds();
        let table = RouteTable::build(config.routes, &config.sub_packages);
        tracing::debug!(routes = table.len(), "router constructed");

        Self {
            inner: Arc::new(RouterInner {
                table,
                allowed,
                host,
                meta: Mutex::new(RouteMeta::default()),
                state: Mutex::new(SyncState::new()),
                before: RwLock::new(Vec::new()),
                after: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Returns the flattened route table.
    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    /// Registers a pre-navigation guard. Append-only; guards cannot be
    /// removed.
    pub fn before_each(
        &self,
        guard: impl Fn(RouteDescriptor, RouteDescriptor, Next) + Send + Sync + 'static,
    ) {
        self.inner
            .before
            .write()
            .expect("guard lock poisoned")
            .push(Arc::new(guard));
    }

    /// Registers a post-navigation observer. Append-only; observers cannot
    /// be removed.
    pub fn after_each(
        &self,
        guard: impl Fn(&RouteDescriptor, &RouteDescriptor) -> RouterResult<()> + Send + Sync + 'static,
    ) {
        self.inner
            .after
            .write()
            .expect("guard lock poisoned")
            .push(Arc::new(guard));
    }

    /// Returns a snapshot of the current/previous route record.
    pub fn route_meta(&self) -> RouteMeta {
        self.inner
            .meta
            .lock()
            .expect("route meta lock poisoned")
            .clone()
    }

    /// Returns the current resolved route, or a minimal default when no
    /// route has landed yet.
    pub fn current_route(&self) -> RouteDescriptor {
        self.inner
            .meta
            .lock()
            .expect("route meta lock poisoned")
            .to
            .clone()
            .unwrap_or_default()
    }

    /// Pushes a new page onto the navigation stack.
    pub async fn navigate_to(&self, target: impl Into<NavigationTarget>) -> RouterResult<()> {
        self.api_navigate(target.into(), NavigateKind::NavigateTo)
            .await
    }

    /// Switches to a tab-bar page.
    pub async fn switch_tab(&self, target: impl Into<NavigationTarget>) -> RouterResult<()> {
        self.api_navigate(target.into(), NavigateKind::SwitchTab)
            .await
    }

    /// Closes all pages and relaunches at the target.
    pub async fn re_launch(&self, target: impl Into<NavigationTarget>) -> RouterResult<()> {
        self.api_navigate(target.into(), NavigateKind::ReLaunch)
            .await
    }

    /// Replaces the current page with the target.
    pub async fn redirect_to(&self, target: impl Into<NavigationTarget>) -> RouterResult<()> {
        self.api_navigate(target.into(), NavigateKind::RedirectTo)
            .await
    }

    /// Pops pages off the navigation stack.
    ///
    /// The back target is resolved against the host's stack before
    /// matching: an out-of-range delta clamps to the bottom of the stack.
    pub async fn navigate_back(&self, options: BackOptions) -> RouterResult<()> {
        self.begin_api_navigation();
        let descriptor = RouteDescriptor {
            kind: NavigateKind::NavigateBack,
            delta: options.delta,
            extra: options.extra,
            ..RouteDescriptor::default()
        };
        self.push_chain(descriptor).await
    }

    /// Installs the launch/load/show lifecycle listeners onto the host
    /// application.
    pub fn attach_to_host(&self, app: &dyn HostApplication) {
        app.attach_lifecycle(Arc::new(self.clone()));
    }

    // ── Internals ────────────────────────────────────────────────────

    fn begin_api_navigation(&self) {
        self.inner
            .state
            .lock()
            .expect("sync state lock poisoned")
            .begin_api_navigation();
    }

    async fn api_navigate(
        &self,
        target: NavigationTarget,
        kind: NavigateKind,
    ) -> RouterResult<()> {
        self.begin_api_navigation();
        let mut descriptor = descriptor::normalize(target);
        descriptor.kind = kind;
        self.push_chain(descriptor).await
    }

    /// Runs a navigation and every redirect it spawns through a bounded
    /// trampoline.
    ///
    /// Only the depth-0 result surfaces to the caller; redirect failures
    /// and hops past [`MAX_REDIRECT_HOPS`] are logged and swallowed, since
    /// the original navigation has already resolved by the time a redirect
    /// is evaluated.
    async fn push_chain(&self, first: RouteDescriptor) -> RouterResult<()> {
        let mut queue = VecDeque::new();
        queue.push_back((first, 0_usize));

        while let Some((descriptor, depth)) = queue.pop_front() {
            if depth > 0 {
                // A redirect navigation counts as an API operation.
                self.begin_api_navigation();
            }

            let span = logging::navigation_span(descriptor.kind.as_str(), &descriptor.path);
            let result = self.push_once(&descriptor).instrument(span).await;

            match result {
                Ok(redirects) => {
                    for redirect in redirects {
                        if depth + 1 > MAX_REDIRECT_HOPS {
                            let error = RouterError::RedirectLimit(MAX_REDIRECT_HOPS);
                            tracing::warn!(code = error.code(), %error, "redirect dropped");
                            continue;
                        }
                        let target = descriptor::normalize(NavigationTarget::Descriptor(redirect));
                        queue.push_back((target, depth + 1));
                    }
                }
                Err(error) if depth == 0 => return Err(error),
                Err(error) => {
                    tracing::warn!(code = error.code(), %error, "redirect navigation failed");
                }
            }
        }

        Ok(())
    }

    /// Runs a single navigation: match "to", match "from", pre-guards,
    /// dispatch, post-guards. Returns the redirect targets collected from
    /// the guard outcomes.
    async fn push_once(&self, descriptor: &RouteDescriptor) -> RouterResult<Vec<RouteDescriptor>> {
        let inner = &self.inner;

        if !inner.allowed.contains(&descriptor.kind) {
            return Err(RouterError::Configuration(format!(
                "navigation type {} is not allowed (expected one of: {})",
                descriptor.kind,
                inner
                    .allowed
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let mut path = descriptor.path.clone();

        // A back navigation targets a page already on the stack.
        if descriptor.kind == NavigateKind::NavigateBack {
            let delta = descriptor.delta.unwrap_or(1);
            if let Some(resolved) =
                dispatch::resolve_back_path(&inner.host.page_stack(), delta)
            {
                path = resolved;
            }
        }

        if !path.is_empty() && !path.starts_with('/') {
            path = format!("/{path}");
        }

        let request = MatchRequest {
            path: if path.is_empty() && descriptor.name.is_some() {
                None
            } else {
                Some(path.clone())
            },
            name: descriptor.name.clone(),
            query: Some(descriptor.query.clone()),
        };

        let to = matcher::match_route(&inner.table, &request);
        {
            let mut meta = inner.meta.lock().expect("route meta lock poisoned");
            meta.to.clone_from(&to);
        }
        let Some(to) = to else {
            let requested = if path.is_empty() {
                descriptor
                    .name
                    .clone()
                    .unwrap_or_else(|| "unknown target".to_string())
            } else {
                path
            };
            return Err(RouterError::NotFound(requested));
        };

        let from = self.match_from();
        {
            let mut meta = inner.meta.lock().expect("route meta lock poisoned");
            meta.from.clone_from(&from);
        }

        let outcomes = {
            let before = inner.before.read().expect("guard lock poisoned").clone();
            match (&from, before.is_empty()) {
                (Some(from), false) => guards::run_before(&before, &to, from).await?,
                _ => Vec::new(),
            }
        };

        dispatch::dispatch(inner.host.as_ref(), descriptor, &to).await?;
        tracing::debug!(path = %to.path, kind = %descriptor.kind, "navigation dispatched");

        if let Some(from) = &from {
            let after = inner.after.read().expect("guard lock poisoned").clone();
            guards::run_after(&after, &to, from);
        }

        Ok(outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                GuardOutcome::Redirect(route) => Some(route),
                GuardOutcome::Approved => None,
            })
            .collect())
    }

    /// Resolves the "from" route from the host's current top-of-stack, or
    /// seeds it from the first declared route when the stack is empty.
    fn match_from(&self) -> Option<RouteDescriptor> {
        let stack = self.inner.host.page_stack();

        if let Some(top) = stack.last() {
            matcher::match_route(&self.inner.table, &MatchRequest::for_path(top.path.clone()))
        } else {
            self.inner.table.first().map(|entry| {
                let mut from = entry.clone();
                from.full_path = Some(from.path.clone());
                from.query = Query::new();
                from
            })
        }
    }

    /// Merges host-supplied parameters into the current "to" query.
    /// Existing explicit keys win over host-supplied ones.
    fn merge_into_to(&self, incoming: &Query) {
        let mut meta = self.inner.meta.lock().expect("route meta lock poisoned");
        let to = meta.to.get_or_insert_with(RouteDescriptor::default);
        to.query = query::merged(incoming, &to.query);
    }

    /// Handles a page-scope "show": compares the host's displayed page
    /// against the recorded "to" route and issues a corrective
    /// host-originated replace when they diverge (or unconditionally
    /// before the first show), unless an explicit API navigation is in
    /// flight.
    async fn reconcile_page_show(&self) {
        let displayed = self
            .inner
            .host
            .page_stack()
            .last()
            .map(|page| page.full_path.clone())
            .filter(|full_path| !full_path.is_empty());

        if let Some(full_path) = displayed {
            let should_reconcile = {
                let state = self.inner.state.lock().expect("sync state lock poisoned");
                let meta = self.inner.meta.lock().expect("route meta lock poisoned");
                let differs = meta
                    .to
                    .as_ref()
                    .map_or(true, |to| to.path != displayed_path(&full_path));
                state.should_reconcile(differs)
            };

            if should_reconcile {
                tracing::debug!(path = %full_path, "reconciling with host-displayed page");
                let corrective = RouteDescriptor {
                    path: full_path,
                    kind: NavigateKind::RedirectTo,
                    host_originated: true,
                    ..RouteDescriptor::default()
                };
                if let Err(error) = self.push_chain(corrective).await {
                    tracing::warn!(code = error.code(), %error, "reconciliation navigation failed");
                }
            }
        }

        self.inner
            .state
            .lock()
            .expect("sync state lock poisoned")
            .observe_show();
    }
}

#[async_trait]
impl LifecycleHooks for Router {
    async fn on_launch(&self, options: LaunchOptions) {
        tracing::debug!("application launch");
        self.merge_into_to(&options.query);
    }

    async fn on_load(&self, params: Query) {
        self.merge_into_to(&params);
    }

    async fn on_show(&self, scope: LifecycleScope, options: ShowOptions) {
        match scope {
            LifecycleScope::App => {
                if let Some(host_query) = &options.query {
                    let mut meta = self.inner.meta.lock().expect("route meta lock poisoned");
                    if let Some(to) = meta.to.as_mut() {
                        to.query = query::merged(host_query, &to.query);
                    }
                }
            }
            LifecycleScope::Page => self.reconcile_page_show().await,
        }
    }
}

/// Strips the leading slash and query string off a displayed full path,
/// yielding a route path comparable with table entries.
fn displayed_path(full_path: &str) -> &str {
    let path = full_path.strip_prefix('/').unwrap_or(full_path);
    path.split('?').next().unwrap_or(path)
}

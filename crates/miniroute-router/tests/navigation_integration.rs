//! Integration tests for the navigation flow.
//!
//! Tests cover: dispatch to the mapped host primitive, guard approval,
//! denial and redirect chaining, back-delta clamping, host failure
//! propagation, the not-found fallback, lifecycle query merging, and the
//! reconciliation of route meta with host-driven page changes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use miniroute_core::{Query, RouterError};
use miniroute_host::{LifecycleScope, NavigateKind, PageHandle};
use miniroute_router::{BackOptions, RouteDescriptor, Router, RouterConfig, MAX_REDIRECT_HOPS};
use miniroute_test::TestHost;

fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor {
            path: "pages/index/index".to_string(),
            name: Some("home".to_string()),
            ..RouteDescriptor::default()
        },
        RouteDescriptor {
            path: "pages/detail/index".to_string(),
            name: Some("detail".to_string()),
            ..RouteDescriptor::default()
        },
        RouteDescriptor {
            path: "pages/login/index".to_string(),
            name: Some("login".to_string()),
            ..RouteDescriptor::default()
        },
        RouteDescriptor::for_path("pages/tab/home"),
    ]
}

fn build_router() -> (Router, Arc<TestHost>) {
    let host = Arc::new(TestHost::new());
    host.seed_stack(&["pages/index/index"]);
    let router = Router::from_config(RouterConfig::with_routes(routes()), host.clone());
    (router, host)
}

fn query(pairs: &[(&str, &str)]) -> Query {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ═════════════════════════════════════════════════════════════════════
// 1. Dispatch: each operation maps to its host primitive exactly once
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_navigate_to_dispatches_once() {
    let (router, host) = build_router();
    router.before_each(|_to, _from, next| next.proceed());

    router.navigate_to("/pages/detail/index").await.unwrap();

    let calls = host.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, NavigateKind::NavigateTo);
    assert_eq!(calls[0].request.url, "/pages/detail/index");
}

#[tokio::test]
async fn test_each_operation_maps_to_its_kind() {
    let (router, host) = build_router();

    router.navigate_to("pages/detail/index").await.unwrap();
    router.switch_tab("pages/tab/home").await.unwrap();
    router.re_launch("pages/index/index").await.unwrap();
    router.redirect_to("pages/detail/index").await.unwrap();
    router.navigate_back(BackOptions::default()).await.unwrap();

    assert_eq!(
        host.call_kinds(),
        vec![
            NavigateKind::NavigateTo,
            NavigateKind::SwitchTab,
            NavigateKind::ReLaunch,
            NavigateKind::RedirectTo,
            NavigateKind::NavigateBack,
        ]
    );
}

#[tokio::test]
async fn test_url_derived_from_matched_route() {
    let (router, host) = build_router();

    // Explicit query wins over the query embedded in the path, and the
    // URL comes from the resolved match with sorted parameters.
    let request = RouteDescriptor::for_path("pages/detail/index?id=7&tab=posts")
        .with_query("id", "42");
    router.navigate_to(request).await.unwrap();

    assert_eq!(
        host.calls()[0].request.url,
        "/pages/detail/index?id=42&tab=posts"
    );
}

#[tokio::test]
async fn test_home_path_dispatches_first_entry() {
    let (router, host) = build_router();

    router.navigate_to("/").await.unwrap();

    assert_eq!(host.calls()[0].request.url, "/pages/index/index");
    assert_eq!(router.route_meta().to.unwrap().path, "pages/index/index");
}

#[tokio::test]
async fn test_extra_options_forwarded() {
    let (router, host) = build_router();

    let mut request = RouteDescriptor::for_path("pages/detail/index");
    request.extra.insert(
        "animationType".to_string(),
        serde_json::Value::String("slide-in-bottom".to_string()),
    );
    router.navigate_to(request).await.unwrap();

    assert_eq!(
        host.calls()[0].request.extra.get("animationType"),
        Some(&serde_json::Value::String("slide-in-bottom".to_string()))
    );
}

// ═════════════════════════════════════════════════════════════════════
// 2. Matching failures and the navigation-type whitelist
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_unknown_route_rejects_without_dispatch() {
    let (router, host) = build_router();

    let error = router.navigate_to("/pages/nonexistent").await.unwrap_err();
    assert!(matches!(error, RouterError::NotFound(_)));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_not_found_fallback_entry_is_used() {
    let host = Arc::new(TestHost::new());
    host.seed_stack(&["pages/index/index"]);

    let mut table = routes();
    table.push(RouteDescriptor {
        path: "pages/missing/index".to_string(),
        name: Some("NotFound".to_string()),
        ..RouteDescriptor::default()
    });
    let router = Router::from_config(RouterConfig::with_routes(table), host.clone());

    router.navigate_to("/pages/nonexistent").await.unwrap();

    assert_eq!(host.calls()[0].request.url, "/pages/missing/index");
}

#[tokio::test]
async fn test_disallowed_kind_is_configuration_error() {
    let host = Arc::new(TestHost::new());
    let config = RouterConfig {
        routes: routes(),
        navigation_types: Some(vec![NavigateKind::NavigateTo]),
        ..RouterConfig::default()
    };
    let router = Router::from_config(config, host.clone());

    let error = router.switch_tab("pages/tab/home").await.unwrap_err();
    assert!(matches!(error, RouterError::Configuration(_)));
    assert!(host.calls().is_empty());
}

// ═════════════════════════════════════════════════════════════════════
// 3. Guard pipeline: approval, denial, and invalid resolution
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_all_proceeding_guards_allow_navigation() {
    let (router, host) = build_router();
    let invoked = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let invoked = invoked.clone();
        router.before_each(move |_to, _from, next| {
            invoked.fetch_add(1, Ordering::SeqCst);
            next.proceed();
        });
    }

    router.navigate_to("/pages/detail/index").await.unwrap();

    assert_eq!(invoked.load(Ordering::SeqCst), 3);
    assert_eq!(host.calls().len(), 1);
}

#[tokio::test]
async fn test_denying_guard_aborts_navigation() {
    let (router, host) = build_router();
    let after_ran = Arc::new(AtomicUsize::new(0));

    router.before_each(|_to, _from, next| next.allow(false));
    let after = after_ran.clone();
    router.after_each(move |_to, _from| {
        after.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let error = router.navigate_to("/pages/detail/index").await.unwrap_err();

    assert!(matches!(error, RouterError::Aborted));
    assert!(host.calls().is_empty());
    assert_eq!(after_ran.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_guard_receives_matched_routes() {
    let (router, _host) = build_router();
    let seen = Arc::new(std::sync::Mutex::new((String::new(), String::new())));

    let seen_clone = seen.clone();
    router.before_each(move |to, from, next| {
        *seen_clone.lock().unwrap() = (to.path.clone(), from.path.clone());
        next.proceed();
    });

    router.navigate_to("/pages/detail/index").await.unwrap();

    let (to_path, from_path) = seen.lock().unwrap().clone();
    assert_eq!(to_path, "pages/detail/index");
    assert_eq!(from_path, "pages/index/index");
}

#[tokio::test]
async fn test_guard_dropping_next_is_invalid() {
    let (router, host) = build_router();
    router.before_each(|_to, _from, next| drop(next));

    let error = router.navigate_to("/pages/detail/index").await.unwrap_err();
    assert!(matches!(error, RouterError::InvalidGuard(_)));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_guards_skipped_when_from_unresolvable() {
    // The host sits on a page the table does not know and no fallback
    // entry exists, so "from" cannot resolve and interception is skipped.
    let host = Arc::new(TestHost::new());
    host.seed_stack(&["pages/foreign/index"]);
    let router = Router::from_config(RouterConfig::with_routes(routes()), host.clone());

    router.before_each(|_to, _from, next| next.allow(false));

    router.navigate_to("/pages/detail/index").await.unwrap();
    assert_eq!(host.calls().len(), 1);
    assert!(router.route_meta().from.is_none());
}

// ═════════════════════════════════════════════════════════════════════
// 4. Redirect chaining
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_redirect_runs_after_original_dispatch() {
    let (router, host) = build_router();

    router.before_each(|to, _from, next| {
        if to.path == "pages/detail/index" {
            next.redirect_path("/pages/login/index");
        } else {
            next.proceed();
        }
    });

    router.navigate_to("/pages/detail/index").await.unwrap();

    let calls = host.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].request.url, "/pages/detail/index");
    assert_eq!(calls[1].kind, NavigateKind::NavigateTo);
    assert_eq!(calls[1].request.url, "/pages/login/index");
    assert_eq!(router.route_meta().to.unwrap().path, "pages/login/index");
}

#[tokio::test]
async fn test_redirect_descriptor_keeps_its_kind() {
    let (router, host) = build_router();

    router.before_each(|to, _from, next| {
        if to.path == "pages/detail/index" {
            next.redirect(RouteDescriptor {
                path: "pages/tab/home".to_string(),
                kind: NavigateKind::SwitchTab,
                ..RouteDescriptor::default()
            });
        } else {
            next.proceed();
        }
    });

    router.navigate_to("/pages/detail/index").await.unwrap();

    assert_eq!(
        host.call_kinds(),
        vec![NavigateKind::NavigateTo, NavigateKind::SwitchTab]
    );
}

#[tokio::test]
async fn test_redirect_failure_does_not_affect_caller() {
    let (router, host) = build_router();

    router.before_each(|to, _from, next| {
        if to.path == "pages/detail/index" {
            // Redirect to a path no table entry matches.
            next.redirect_path("/pages/nonexistent");
        } else {
            next.proceed();
        }
    });

    // The original navigation resolves even though its redirect fails.
    router.navigate_to("/pages/detail/index").await.unwrap();
    assert_eq!(host.calls().len(), 1);
}

#[tokio::test]
async fn test_unbounded_redirect_is_capped() {
    let (router, host) = build_router();

    // A guard that redirects unconditionally would ping-pong forever;
    // the trampoline drops hops past the cap.
    router.before_each(|_to, _from, next| next.redirect_path("/pages/login/index"));

    router.navigate_to("/pages/detail/index").await.unwrap();

    assert_eq!(host.calls().len(), 1 + MAX_REDIRECT_HOPS);
}

// ═════════════════════════════════════════════════════════════════════
// 5. Back navigation: delta resolution against the host stack
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_navigate_back_default_delta() {
    let (router, host) = build_router();
    host.seed_stack(&["pages/index/index", "pages/detail/index", "pages/login/index"]);

    router.navigate_back(BackOptions::default()).await.unwrap();

    assert_eq!(host.calls()[0].request.url, "/pages/detail/index");
    assert_eq!(router.route_meta().to.unwrap().path, "pages/detail/index");
}

#[tokio::test]
async fn test_navigate_back_delta_two_resolves_bottom() {
    let (router, host) = build_router();
    host.seed_stack(&["pages/index/index", "pages/detail/index", "pages/login/index"]);

    router
        .navigate_back(BackOptions::with_delta(2))
        .await
        .unwrap();

    // max(0, 3 - 1 - 2) = 0
    assert_eq!(host.calls()[0].request.url, "/pages/index/index");
    assert_eq!(host.calls()[0].request.delta, Some(2));
}

#[tokio::test]
async fn test_navigate_back_out_of_range_clamps() {
    let (router, host) = build_router();
    host.seed_stack(&["pages/index/index", "pages/detail/index", "pages/login/index"]);

    router
        .navigate_back(BackOptions::with_delta(10))
        .await
        .unwrap();

    assert_eq!(host.calls()[0].request.url, "/pages/index/index");
}

// ═════════════════════════════════════════════════════════════════════
// 6. Host dispatch failures
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_host_failure_rejects_and_skips_observers() {
    let (router, host) = build_router();
    let after_ran = Arc::new(AtomicUsize::new(0));

    let after = after_ran.clone();
    router.after_each(move |_to, _from| {
        after.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    host.fail_next("can not navigate to tab page");
    let error = router.navigate_to("/pages/detail/index").await.unwrap_err();

    assert!(matches!(error, RouterError::HostDispatch(_)));
    assert_eq!(after_ran.load(Ordering::SeqCst), 0);
}

// ═════════════════════════════════════════════════════════════════════
// 7. Post-navigation observers
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_observers_run_after_successful_dispatch() {
    let (router, _host) = build_router();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    router.after_each(move |to, from| {
        seen_clone
            .lock()
            .unwrap()
            .push((to.path.clone(), from.path.clone()));
        Ok(())
    });

    router.navigate_to("/pages/detail/index").await.unwrap();

    let observed = seen.lock().unwrap().clone();
    assert_eq!(
        observed,
        vec![("pages/detail/index".to_string(), "pages/index/index".to_string())]
    );
}

#[tokio::test]
async fn test_failing_observer_does_not_block_siblings() {
    let (router, _host) = build_router();
    let sibling_ran = Arc::new(AtomicUsize::new(0));

    router.after_each(|_to, _from| Err(RouterError::Observer("sink offline".to_string())));
    let sibling = sibling_ran.clone();
    router.after_each(move |_to, _from| {
        sibling.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    router.navigate_to("/pages/detail/index").await.unwrap();
    assert_eq!(sibling_ran.load(Ordering::SeqCst), 1);
}

// ═════════════════════════════════════════════════════════════════════
// 8. Route meta: "from" seeding and accessors
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_from_seeded_from_first_route_on_empty_stack() {
    let host = Arc::new(TestHost::new());
    let router = Router::from_config(RouterConfig::with_routes(routes()), host);

    router.navigate_to("/pages/detail/index").await.unwrap();

    let from = router.route_meta().from.unwrap();
    assert_eq!(from.path, "pages/index/index");
    assert_eq!(from.full_path.as_deref(), Some("pages/index/index"));
    assert!(from.query.is_empty());
}

#[tokio::test]
async fn test_current_route_defaults_before_navigation() {
    let (router, _host) = build_router();
    let current = router.current_route();
    assert!(current.path.is_empty());
    assert!(current.query.is_empty());
}

#[tokio::test]
async fn test_current_route_after_navigation() {
    let (router, _host) = build_router();
    router.navigate_to("/pages/detail/index?id=7").await.unwrap();
    assert_eq!(router.current_route().path, "pages/detail/index");
    assert_eq!(
        router.current_route().query.get("id").map(String::as_str),
        Some("7")
    );
}

// ═════════════════════════════════════════════════════════════════════
// 9. Lifecycle: query merging and host reconciliation
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_launch_and_load_merge_into_to_query() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());

    host.fire_launch(query(&[("scene", "1001")])).await;
    host.fire_load(query(&[("referrer", "share")])).await;

    let to = router.route_meta().to.unwrap();
    assert_eq!(to.query.get("scene").map(String::as_str), Some("1001"));
    assert_eq!(to.query.get("referrer").map(String::as_str), Some("share"));
}

#[tokio::test]
async fn test_existing_query_wins_over_lifecycle_params() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());

    router
        .navigate_to(RouteDescriptor::for_path("pages/detail/index").with_query("id", "42"))
        .await
        .unwrap();
    host.fire_load(query(&[("id", "7"), ("tab", "posts")])).await;

    let to = router.route_meta().to.unwrap();
    assert_eq!(to.query.get("id").map(String::as_str), Some("42"));
    assert_eq!(to.query.get("tab").map(String::as_str), Some("posts"));
}

#[tokio::test]
async fn test_app_show_merges_query() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());

    router.navigate_to("/pages/detail/index?id=1").await.unwrap();
    host.fire_show(LifecycleScope::App, Some(query(&[("id", "9"), ("from", "icon")])))
        .await;

    let to = router.route_meta().to.unwrap();
    assert_eq!(to.query.get("id").map(String::as_str), Some("1"));
    assert_eq!(to.query.get("from").map(String::as_str), Some("icon"));
}

#[tokio::test]
async fn test_cold_launch_show_lands_initial_route() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());

    // No API navigation has happened; the first page show seeds route
    // meta from the host's displayed page without a host call.
    host.fire_show(LifecycleScope::Page, None).await;

    assert!(host.calls().is_empty());
    assert_eq!(router.route_meta().to.unwrap().path, "pages/index/index");
}

#[tokio::test]
async fn test_show_reconciles_host_driven_navigation() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());

    router.navigate_to("/pages/detail/index").await.unwrap();
    host.fire_show(LifecycleScope::Page, None).await;
    assert_eq!(router.route_meta().to.unwrap().path, "pages/detail/index");

    // A system back-swipe pops the detail page without the router's
    // involvement.
    host.set_stack(vec![PageHandle::new(
        "pages/index/index",
        "/pages/index/index",
    )]);
    let calls_before = host.calls().len();
    host.fire_show(LifecycleScope::Page, None).await;

    // Exactly one corrective host-originated navigation: route meta
    // follows the host, but no redundant primitive call is issued.
    assert_eq!(host.calls().len(), calls_before);
    assert_eq!(router.route_meta().to.unwrap().path, "pages/index/index");
}

#[tokio::test]
async fn test_show_without_divergence_does_not_reconcile() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());
    let guard_runs = Arc::new(AtomicUsize::new(0));
    let runs = guard_runs.clone();
    router.before_each(move |_to, _from, next| {
        runs.fetch_add(1, Ordering::SeqCst);
        next.proceed();
    });

    router.navigate_to("/pages/detail/index").await.unwrap();
    host.fire_show(LifecycleScope::Page, None).await;
    let runs_after_launch = guard_runs.load(Ordering::SeqCst);

    // The displayed page still matches the recorded route.
    host.fire_show(LifecycleScope::Page, None).await;
    assert_eq!(guard_runs.load(Ordering::SeqCst), runs_after_launch);
}

#[tokio::test]
async fn test_api_navigation_suppresses_reconciliation() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());

    router.navigate_to("/pages/detail/index").await.unwrap();
    // The host diverges before the show event for the API navigation has
    // been processed; reconciliation must not fight the in-flight call.
    host.set_stack(vec![PageHandle::new(
        "pages/index/index",
        "/pages/index/index",
    )]);
    host.fire_show(LifecycleScope::Page, None).await;
    assert_eq!(router.route_meta().to.unwrap().path, "pages/detail/index");

    // The flag was consumed by the show above; a second divergent show
    // now reconciles.
    host.fire_show(LifecycleScope::Page, None).await;
    assert_eq!(router.route_meta().to.unwrap().path, "pages/index/index");
}

#[tokio::test]
async fn test_reconciliation_runs_guards() {
    let (router, host) = build_router();
    router.attach_to_host(host.as_ref());
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    router.before_each(move |to, _from, next| {
        seen_clone.lock().unwrap().push(to.path.clone());
        next.proceed();
    });

    host.fire_show(LifecycleScope::Page, None).await;

    assert_eq!(seen.lock().unwrap().clone(), vec!["pages/index/index".to_string()]);
}

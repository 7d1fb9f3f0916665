//! The navigation dispatcher.
//!
//! Maps a resolved descriptor's navigation type to the corresponding host
//! primitive, builds the target URL from the matched "to" route, and wraps
//! the host's callback-based result into a single completion signal.

use miniroute_core::{query, RouterError, RouterResult};
use miniroute_host::{Completion, HostRuntime, NavigateRequest, PageHandle};

use crate::descriptor::RouteDescriptor;

/// Builds the target URL from the matched "to" route.
///
/// The URL is always derived from the resolved match, not from the
/// caller's raw descriptor, so normalized query ordering and
/// matched-table fields win.
pub fn build_url(to: &RouteDescriptor) -> String {
    let query_string = query::stringify(&to.query);
    if query_string.is_empty() {
        format!("/{}", to.path)
    } else {
        format!("/{}?{}", to.path, query_string)
    }
}

/// Resolves the path `delta` pages down from the top of the stack.
///
/// The target index is `max(0, depth - 1 - delta)`, so an out-of-range
/// delta clamps to the bottom of the stack rather than erroring. Returns
/// `None` for an empty stack.
pub fn resolve_back_path(stack: &[PageHandle], delta: usize) -> Option<String> {
    let top = stack.len().checked_sub(1)?;
    let target_index = top.saturating_sub(delta);
    Some(stack[target_index].path.clone())
}

/// Dispatches a navigation to the host primitive for its kind.
///
/// Host-originated descriptors succeed without a host call; they exist to
/// let a route "land" in route meta without issuing a redundant
/// navigation. For everything else the host's success/fail callbacks are
/// awaited through the completion signal.
pub(crate) async fn dispatch(
    host: &dyn HostRuntime,
    descriptor: &RouteDescriptor,
    to: &RouteDescriptor,
) -> RouterResult<()> {
    if descriptor.host_originated {
        return Ok(());
    }

    let request = NavigateRequest {
        url: build_url(to),
        delta: descriptor.delta,
        extra: descriptor.extra.clone(),
    };

    let (completion, signal) = Completion::channel();
    host.invoke(descriptor.kind, request, completion);

    match signal.await {
        Ok(result) => result,
        Err(_) => Err(RouterError::HostDispatch(
            "host dropped the completion handle without reporting".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_without_query() {
        let to = RouteDescriptor::for_path("pages/detail/index");
        assert_eq!(build_url(&to), "/pages/detail/index");
    }

    #[test]
    fn test_build_url_with_query() {
        let to = RouteDescriptor::for_path("pages/detail/index")
            .with_query("id", "7")
            .with_query("tab", "posts");
        assert_eq!(build_url(&to), "/pages/detail/index?id=7&tab=posts");
    }

    fn stack(paths: &[&str]) -> Vec<PageHandle> {
        paths
            .iter()
            .map(|path| PageHandle::new(*path, format!("/{path}")))
            .collect()
    }

    #[test]
    fn test_resolve_back_default_delta() {
        let stack = stack(&["pages/a", "pages/b", "pages/c"]);
        assert_eq!(resolve_back_path(&stack, 1).as_deref(), Some("pages/b"));
    }

    #[test]
    fn test_resolve_back_delta_two() {
        let stack = stack(&["pages/a", "pages/b", "pages/c"]);
        assert_eq!(resolve_back_path(&stack, 2).as_deref(), Some("pages/a"));
    }

    #[test]
    fn test_resolve_back_clamps_to_bottom() {
        let stack = stack(&["pages/a", "pages/b", "pages/c"]);
        assert_eq!(resolve_back_path(&stack, 10).as_deref(), Some("pages/a"));
    }

    #[test]
    fn test_resolve_back_empty_stack() {
        assert_eq!(resolve_back_path(&[], 1), None);
    }

    #[test]
    fn test_resolve_back_single_page() {
        let stack = stack(&["pages/a"]);
        assert_eq!(resolve_back_path(&stack, 1).as_deref(), Some("pages/a"));
    }
}

//! Logging integration for the miniroute router.
//!
//! Provides helpers for configuring [`tracing`]-based logging and for
//! creating per-navigation spans.

/// Sets up the global tracing subscriber.
///
/// The `filter` argument accepts any `tracing_subscriber::EnvFilter`
/// directive (e.g. "debug", "info", "miniroute_router=trace"). With
/// `pretty` set a human-readable format is used; otherwise a structured
/// JSON format suitable for log collection.
pub fn setup_logging(filter: &str, pretty: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    if pretty {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for a single navigation.
///
/// Attach this span to the navigation pipeline so that all log entries
/// emitted while matching, guarding, and dispatching carry the requested
/// kind and target.
///
/// # Examples
///
/// ```
/// use miniroute_core::logging::navigation_span;
///
/// let span = navigation_span("navigateTo", "/pages/detail/index");
/// let _guard = span.enter();
/// tracing::info!("dispatching");
/// ```
pub fn navigation_span(kind: &str, target: &str) -> tracing::Span {
    tracing::info_span!("navigation", kind = kind, target = target)
}

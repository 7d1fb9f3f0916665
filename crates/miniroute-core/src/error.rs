//! Core error types for the miniroute router.
//!
//! This module provides the [`RouterError`] enum shared by every crate in the
//! workspace, covering configuration errors, matching failures, guard
//! outcomes, and host dispatch failures.

use thiserror::Error;

/// The primary error type for the miniroute router.
///
/// Every navigation entry point resolves to `Ok(())` or one of these
/// variants. Observer failures ([`RouterError::Observer`]) and redirect-chain
/// failures are logged at the site that produced them and never surface to
/// the original caller.
#[derive(Error, Debug)]
pub enum RouterError {
    // ── Configuration ────────────────────────────────────────────────

    /// The requested navigation type is not in the router's allowed set.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Matching ─────────────────────────────────────────────────────

    /// The matcher found no table entry and no not-found fallback.
    #[error("Route not found: {0}")]
    NotFound(String),

    // ── Guards ───────────────────────────────────────────────────────

    /// A pre-navigation guard explicitly denied the navigation.
    #[error("Navigation aborted by guard")]
    Aborted,

    /// A pre-navigation guard dropped its completion handle without
    /// resolving, or resolved with an unusable value.
    #[error("Invalid guard resolution: {0}")]
    InvalidGuard(String),

    /// A post-navigation observer failed. Isolated per guard and logged,
    /// never propagated to the navigation caller.
    #[error("After-guard failed: {0}")]
    Observer(String),

    // ── Dispatch ─────────────────────────────────────────────────────

    /// The host primitive reported failure, or never reported completion.
    #[error("Host dispatch failed: {0}")]
    HostDispatch(String),

    /// A redirect chain exceeded the maximum depth.
    #[error("Redirect chain exceeded {0} hops")]
    RedirectLimit(usize),
}

impl RouterError {
    /// Returns a short stable code identifying the error category.
    ///
    /// Used as a structured field when logging swallowed failures.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::NotFound(_) => "not_found",
            Self::Aborted => "aborted",
            Self::InvalidGuard(_) => "invalid_guard",
            Self::Observer(_) => "observer",
            Self::HostDispatch(_) => "host_dispatch",
            Self::RedirectLimit(_) => "redirect_limit",
        }
    }
}

/// A convenience type alias for `Result<T, RouterError>`.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::NotFound("pages/missing/index".into());
        assert_eq!(err.to_string(), "Route not found: pages/missing/index");
    }

    #[test]
    fn test_aborted_display() {
        assert_eq!(
            RouterError::Aborted.to_string(),
            "Navigation aborted by guard"
        );
    }

    #[test]
    fn test_redirect_limit_display() {
        let err = RouterError::RedirectLimit(8);
        assert_eq!(err.to_string(), "Redirect chain exceeded 8 hops");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RouterError::Configuration("x".into()).code(), "configuration");
        assert_eq!(RouterError::NotFound("x".into()).code(), "not_found");
        assert_eq!(RouterError::Aborted.code(), "aborted");
        assert_eq!(RouterError::InvalidGuard("x".into()).code(), "invalid_guard");
        assert_eq!(RouterError::Observer("x".into()).code(), "observer");
        assert_eq!(RouterError::HostDispatch("x".into()).code(), "host_dispatch");
        assert_eq!(RouterError::RedirectLimit(8).code(), "redirect_limit");
    }
}

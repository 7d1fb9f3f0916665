//! Navigation primitives and page-stack introspection.
//!
//! The host exposes its five page-navigation primitives as callback-based
//! calls. [`HostRuntime::invoke`] hands the host a single-use [`Completion`]
//! handle; the router awaits the paired [`CompletionSignal`] to turn the
//! host's success/fail callbacks into one completion future.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use miniroute_core::{RouterError, RouterResult};

/// The fixed set of navigation primitives a host runtime provides.
///
/// Serialized with the host ecosystem's camelCase spelling, so a
/// configuration value like `"switchTab"` deserializes directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigateKind {
    /// Push a new page onto the navigation stack.
    NavigateTo,
    /// Switch to a tab-bar page, closing all non-tab pages.
    SwitchTab,
    /// Close all pages and relaunch at the target.
    ReLaunch,
    /// Replace the current page with the target.
    RedirectTo,
    /// Pop one or more pages off the navigation stack.
    NavigateBack,
}

impl NavigateKind {
    /// All five canonical navigation kinds, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::NavigateTo,
        Self::SwitchTab,
        Self::ReLaunch,
        Self::RedirectTo,
        Self::NavigateBack,
    ];

    /// Returns the camelCase name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NavigateTo => "navigateTo",
            Self::SwitchTab => "switchTab",
            Self::ReLaunch => "reLaunch",
            Self::RedirectTo => "redirectTo",
            Self::NavigateBack => "navigateBack",
        }
    }
}

impl Default for NavigateKind {
    fn default() -> Self {
        Self::NavigateTo
    }
}

impl fmt::Display for NavigateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigateKind {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RouterError::Configuration(format!("unknown navigation type: {s}")))
    }
}

/// Free-form options forwarded verbatim to the host primitive
/// (animation settings and the like).
pub type ExtraOptions = HashMap<String, serde_json::Value>;

/// The request handed to a host navigation primitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    /// The target URL: `/` + matched path, plus the stringified query.
    pub url: String,
    /// For back navigation, the number of pages to pop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<usize>,
    /// Pass-through options the router forwards without inspecting.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: ExtraOptions,
}

/// A page on the host's navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    /// The declared route path, without a leading slash.
    pub path: String,
    /// The full display path: leading slash plus any query string.
    pub full_path: String,
}

impl PageHandle {
    /// Creates a page handle from its route path and full display path.
    pub fn new(path: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            full_path: full_path.into(),
        }
    }
}

/// The receiving half of a [`Completion`]; resolves when the host reports.
///
/// Yields `Err(RecvError)` if the host dropped the handle without calling
/// either callback.
pub type CompletionSignal = oneshot::Receiver<RouterResult<()>>;

/// Single-use success/fail handle passed to a host primitive.
///
/// The host calls exactly one of [`succeed`](Completion::succeed) or
/// [`fail`](Completion::fail); both consume the handle.
///
/// # Examples
///
/// ```
/// use miniroute_host::Completion;
///
/// let (completion, signal) = Completion::channel();
/// completion.succeed();
/// # drop(signal);
/// ```
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<RouterResult<()>>,
}

impl Completion {
    /// Creates a completion handle and its paired signal.
    pub fn channel() -> (Self, CompletionSignal) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Reports successful navigation.
    pub fn succeed(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Reports failed navigation with the host's failure message.
    pub fn fail(self, message: impl Into<String>) {
        let _ = self
            .tx
            .send(Err(RouterError::HostDispatch(message.into())));
    }
}

/// The host runtime's navigation surface.
///
/// Implementations wrap the surrounding application environment: the five
/// navigation primitives as callback-based calls, and an accessor for the
/// ordered page stack (bottom first, currently displayed page last).
pub trait HostRuntime: Send + Sync {
    /// Invokes the host primitive for `kind` with the given request.
    ///
    /// The implementation must eventually consume `completion` by calling
    /// `succeed` or `fail`; dropping it unresolved surfaces to the router
    /// as a dispatch failure.
    fn invoke(&self, kind: NavigateKind, request: NavigateRequest, completion: Completion);

    /// Returns the host's current navigation stack, bottom first.
    fn page_stack(&self) -> Vec<PageHandle>;
}

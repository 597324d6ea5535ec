//! Host capabilities the navigation guard depends on
//!
//! The guard never implements routing or page lifecycle itself. The host
//! provides:
//! - [`NavigationInterceptor`]: the router's transition authority, which
//!   asks the guard's predicate on every attempt and owns the resulting
//!   [`BlockerState`]
//! - [`UnloadPrompt`]: the browser's native "leave this page?" confirmation

use std::fmt;
use std::sync::Arc;

/// Interception state, owned by the host router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockerState {
    /// Navigation proceeds freely
    #[default]
    Unblocked,
    /// An attempt was intercepted and awaits resolution
    Blocked,
    /// The host is completing an authorized navigation
    Proceeding,
}

impl fmt::Display for BlockerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unblocked => "unblocked",
            Self::Blocked => "blocked",
            Self::Proceeding => "proceeding",
        })
    }
}

/// One in-app navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAttempt {
    /// Current location
    pub from: String,
    /// Requested location
    pub to: String,
}

impl NavigationAttempt {
    /// Create an attempt
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether the attempt actually leaves the current location
    #[inline]
    #[must_use]
    pub fn leaves(&self) -> bool {
        self.from != self.to
    }
}

/// Activation predicate evaluated by the host at each attempt
pub type BlockPredicate = Arc<dyn Fn(&NavigationAttempt) -> bool + Send + Sync>;

/// Router transition authority
///
/// The host calls the registered predicate whenever navigation is
/// attempted; a `true` answer moves it to [`BlockerState::Blocked`] until
/// the guard commands [`NavigationInterceptor::proceed`] or
/// [`NavigationInterceptor::reset`].
#[cfg_attr(test, mockall::automock)]
pub trait NavigationInterceptor: Send + Sync {
    /// Install the activation predicate, replacing any previous one
    fn register(&self, predicate: BlockPredicate);

    /// Current interception state
    fn state(&self) -> BlockerState;

    /// Complete the intercepted navigation
    fn proceed(&self);

    /// Abandon the intercepted navigation and stay
    fn reset(&self);
}

/// Native unload confirmation (tab close / refresh)
///
/// Warning only: the browser cannot run async work on unload.
#[cfg_attr(test, mockall::automock)]
pub trait UnloadPrompt: Send + Sync {
    /// Start asking for confirmation on unload
    fn install(&self);

    /// Stop asking
    fn uninstall(&self);
}

impl<T: NavigationInterceptor + ?Sized> NavigationInterceptor for Arc<T> {
    fn register(&self, predicate: BlockPredicate) {
        (**self).register(predicate);
    }

    fn state(&self) -> BlockerState {
        (**self).state()
    }

    fn proceed(&self) {
        (**self).proceed();
    }

    fn reset(&self) {
        (**self).reset();
    }
}

impl<T: UnloadPrompt + ?Sized> UnloadPrompt for Arc<T> {
    fn install(&self) {
        (**self).install();
    }

    fn uninstall(&self) {
        (**self).uninstall();
    }
}

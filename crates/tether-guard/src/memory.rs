//! In-memory host for the guard
//!
//! [`MemoryRouter`] and [`MemoryUnloadPrompt`] implement the host
//! capabilities without a browser, for headless embedding and tests.

use crate::interceptor::{
    BlockPredicate, BlockerState, NavigationAttempt, NavigationInterceptor, UnloadPrompt,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tether_core::{Store, Subscription};

/// Result of [`MemoryRouter::navigate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Location changed
    Navigated,
    /// The registered predicate intercepted the attempt
    Blocked,
    /// Another attempt is already awaiting resolution
    Ignored,
}

#[derive(Default)]
struct RouterInner {
    location: String,
    pending: Option<String>,
    predicate: Option<BlockPredicate>,
    history: Vec<String>,
}

/// Router holding its location in memory
pub struct MemoryRouter {
    inner: Mutex<RouterInner>,
    state: Store<BlockerState>,
}

impl MemoryRouter {
    /// Router starting at `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        let location = initial.into();
        Self {
            inner: Mutex::new(RouterInner {
                history: vec![location.clone()],
                location,
                ..RouterInner::default()
            }),
            state: Store::new(BlockerState::Unblocked),
        }
    }

    /// Attempt to move to `to`
    pub fn navigate(&self, to: impl Into<String>) -> NavigationOutcome {
        let to = to.into();
        if self.state.snapshot() == BlockerState::Blocked {
            tracing::debug!(%to, "navigation ignored: attempt already pending");
            return NavigationOutcome::Ignored;
        }

        let (attempt, predicate) = {
            let inner = self.inner.lock();
            (
                NavigationAttempt::new(inner.location.clone(), to),
                inner.predicate.clone(),
            )
        };

        // The predicate runs unlocked; it may read guard state.
        if predicate.is_some_and(|p| p(&attempt)) {
            self.inner.lock().pending = Some(attempt.to);
            self.state.set(BlockerState::Blocked);
            return NavigationOutcome::Blocked;
        }

        self.commit(attempt.to);
        NavigationOutcome::Navigated
    }

    /// Current location
    #[must_use]
    pub fn location(&self) -> String {
        self.inner.lock().location.clone()
    }

    /// Destination of the intercepted attempt, if any
    #[must_use]
    pub fn pending(&self) -> Option<String> {
        self.inner.lock().pending.clone()
    }

    /// Every location visited, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.inner.lock().history.clone()
    }

    /// Listen for blocker state changes
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&BlockerState) + Send + Sync + 'static,
    ) -> Subscription {
        self.state.subscribe(listener)
    }

    fn commit(&self, to: String) {
        let mut inner = self.inner.lock();
        tracing::debug!(from = %inner.location, %to, "navigated");
        inner.history.push(to.clone());
        inner.location = to;
    }
}

impl NavigationInterceptor for MemoryRouter {
    fn register(&self, predicate: BlockPredicate) {
        self.inner.lock().predicate = Some(predicate);
    }

    fn state(&self) -> BlockerState {
        self.state.snapshot()
    }

    fn proceed(&self) {
        if self.state.snapshot() != BlockerState::Blocked {
            return;
        }
        self.state.set(BlockerState::Proceeding);
        let pending = self.inner.lock().pending.take();
        if let Some(to) = pending {
            self.commit(to);
        }
        self.state.set(BlockerState::Unblocked);
    }

    fn reset(&self) {
        if self.state.snapshot() != BlockerState::Blocked {
            return;
        }
        self.inner.lock().pending = None;
        self.state.set(BlockerState::Unblocked);
    }
}

impl fmt::Debug for MemoryRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MemoryRouter")
            .field("location", &inner.location)
            .field("pending", &inner.pending)
            .field("state", &self.state.snapshot())
            .finish_non_exhaustive()
    }
}

/// What the page does when the user closes or reloads it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    /// Show the native confirmation
    Prompt,
    /// Unload silently
    Allow,
}

/// Unload prompt that records installation
#[derive(Debug, Default)]
pub struct MemoryUnloadPrompt {
    installed: AtomicBool,
    installs: AtomicUsize,
}

impl MemoryUnloadPrompt {
    /// Not installed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a tab close or reload
    #[must_use]
    pub fn request_unload(&self) -> UnloadDecision {
        if self.is_installed() {
            UnloadDecision::Prompt
        } else {
            UnloadDecision::Allow
        }
    }

    /// Whether the prompt is installed
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// How many times the prompt has been installed
    #[must_use]
    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::Acquire)
    }
}

impl UnloadPrompt for MemoryUnloadPrompt {
    fn install(&self) {
        if !self.installed.swap(true, Ordering::AcqRel) {
            self.installs.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn uninstall(&self) {
        self.installed.store(false, Ordering::Release);
    }
}

//! Navigation guard
//!
//! Keeps a user from silently abandoning a dirty draft. While the guard is
//! active (`dirty && enabled`) the host intercepts in-app navigation and the
//! native unload prompt is installed. An intercepted attempt is resolved by
//! exactly one of:
//! - [`NavigationGuard::on_cancel`]: stay on the page
//! - [`NavigationGuard::on_confirm_leave`]: leave and discard
//! - [`NavigationGuard::on_save_and_leave`]: save, then leave only if the
//!   save succeeded

use crate::interceptor::{
    BlockPredicate, BlockerState, NavigationAttempt, NavigationInterceptor, UnloadPrompt,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tether_core::{AsyncAction, GuardConfig, SaveError, Store, Subscription};

/// What a dialog command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Navigation abandoned; the user stays
    Stayed,
    /// Navigation completed
    Left,
    /// Nothing was intercepted, so the command did nothing
    NotBlocked,
}

/// Construction options for [`NavigationGuard`]
#[derive(Clone, Default)]
pub struct GuardOptions {
    /// Settings
    pub config: GuardConfig,
    /// Save run by "save and leave"; without one it behaves like "leave"
    pub on_save: Option<AsyncAction<SaveError>>,
}

impl GuardOptions {
    /// Options from settings, no save action
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            on_save: None,
        }
    }

    /// With save action
    #[must_use]
    pub fn with_save(mut self, on_save: AsyncAction<SaveError>) -> Self {
        self.on_save = Some(on_save);
        self
    }
}

impl fmt::Debug for GuardOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardOptions")
            .field("config", &self.config)
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

/// Observable guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardState {
    /// Navigation is being intercepted (`dirty && enabled`)
    pub is_active: bool,
    /// "Save and leave" is waiting on the save action
    pub is_saving: bool,
    /// Host interception state as last seen by the guard
    pub blocker: BlockerState,
}

// Predicate inputs, shared with the closure registered on the host.
#[derive(Debug)]
struct Flags {
    dirty: AtomicBool,
    enabled: AtomicBool,
}

impl Flags {
    fn active(&self) -> bool {
        self.dirty.load(Ordering::Acquire) && self.enabled.load(Ordering::Acquire)
    }
}

/// Navigation guard over a host interceptor and unload prompt
pub struct NavigationGuard<I: NavigationInterceptor, U: UnloadPrompt> {
    interceptor: I,
    unload: U,
    on_save: Option<AsyncAction<SaveError>>,
    flags: Arc<Flags>,
    state: Store<GuardState>,
    unload_installed: Mutex<bool>,
}

impl<I: NavigationInterceptor, U: UnloadPrompt> NavigationGuard<I, U> {
    /// Create a guard and register its predicate with the host
    ///
    /// The guard starts clean, so nothing is intercepted until
    /// [`NavigationGuard::set_dirty`] reports a dirty draft.
    pub fn new(interceptor: I, unload: U, options: GuardOptions) -> Self {
        let flags = Arc::new(Flags {
            dirty: AtomicBool::new(false),
            enabled: AtomicBool::new(options.config.enabled),
        });

        let state = Store::new(GuardState {
            is_active: flags.active(),
            ..GuardState::default()
        });

        let predicate_flags = Arc::clone(&flags);
        let predicate_state = state.clone();
        let predicate: BlockPredicate = Arc::new(move |attempt: &NavigationAttempt| {
            let block = predicate_flags.active() && attempt.leaves();
            if block {
                tracing::info!(
                    from = %attempt.from,
                    to = %attempt.to,
                    "navigation intercepted: unsaved changes"
                );
                predicate_state.update(|s| s.blocker = BlockerState::Blocked);
            }
            block
        });
        interceptor.register(predicate);

        Self {
            interceptor,
            unload,
            on_save: options.on_save,
            flags,
            state,
            unload_installed: Mutex::new(false),
        }
    }

    /// Report whether the guarded draft is dirty
    pub fn set_dirty(&self, dirty: bool) {
        self.flags.dirty.store(dirty, Ordering::Release);
        self.reevaluate();
    }

    /// Turn interception on or off
    pub fn set_enabled(&self, enabled: bool) {
        self.flags.enabled.store(enabled, Ordering::Release);
        self.reevaluate();
    }

    /// Whether navigation is currently being intercepted
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flags.active()
    }

    /// Last reported dirty flag
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.flags.dirty.load(Ordering::Acquire)
    }

    /// Whether "save and leave" is waiting on the save action
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state.with(|s| s.is_saving)
    }

    /// Current observable state
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state.snapshot()
    }

    /// Listen for guard state changes
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&GuardState) + Send + Sync + 'static,
    ) -> Subscription {
        self.state.subscribe(listener)
    }

    /// Host interception state
    #[must_use]
    pub fn blocker_state(&self) -> BlockerState {
        self.interceptor.state()
    }

    /// Whether the native unload prompt is installed
    #[must_use]
    pub fn unload_prompt_installed(&self) -> bool {
        *self.unload_installed.lock()
    }

    /// Stay on the page
    pub fn on_cancel(&self) -> Resolution {
        if !self.is_blocked("cancel") {
            return Resolution::NotBlocked;
        }
        tracing::info!("navigation cancelled, staying on page");
        self.interceptor.reset();
        self.publish();
        Resolution::Stayed
    }

    /// Leave without saving
    pub fn on_confirm_leave(&self) -> Resolution {
        if !self.is_blocked("confirm leave") {
            return Resolution::NotBlocked;
        }
        tracing::info!("leaving page, unsaved changes discarded");
        self.interceptor.proceed();
        self.publish();
        Resolution::Left
    }

    /// Save, then leave if the save succeeded
    ///
    /// # Errors
    /// The save action's [`SaveError`]; the navigation stays blocked so the
    /// user can retry or discard
    pub async fn on_save_and_leave(&self) -> Result<Resolution, SaveError> {
        if !self.is_blocked("save and leave") {
            return Ok(Resolution::NotBlocked);
        }
        let Some(save) = self.on_save.clone() else {
            return Ok(self.on_confirm_leave());
        };

        let saving = SavingScope::enter(self);
        let result = save().await;
        if result.is_ok() {
            // Proceed before the scope closes so going clean cannot reset first.
            self.interceptor.proceed();
        }
        drop(saving);

        match result {
            Ok(()) => {
                tracing::info!("saved before leaving page");
                Ok(Resolution::Left)
            }
            Err(e) => {
                tracing::warn!(error = %e, "save before leaving failed, staying on page");
                Err(e)
            }
        }
    }

    fn is_blocked(&self, command: &str) -> bool {
        let state = self.interceptor.state();
        if state == BlockerState::Blocked {
            true
        } else {
            tracing::debug!(%command, %state, "guard command ignored: not blocked");
            false
        }
    }

    fn reevaluate(&self) {
        let active = self.flags.active();

        {
            let mut installed = self.unload_installed.lock();
            if active && !*installed {
                self.unload.install();
                *installed = true;
                tracing::debug!("unload prompt installed");
            } else if !active && *installed {
                self.unload.uninstall();
                *installed = false;
                tracing::debug!("unload prompt removed");
            }
        }

        // A save-and-leave clears the dirty flag on its way to proceeding;
        // resetting here would strand that navigation.
        if !active && !self.is_saving() && self.interceptor.state() == BlockerState::Blocked {
            tracing::debug!("guard no longer active, releasing intercepted navigation");
            self.interceptor.reset();
        }
        self.publish();
    }

    fn publish(&self) {
        let next = GuardState {
            is_active: self.flags.active(),
            is_saving: self.is_saving(),
            blocker: self.interceptor.state(),
        };
        if self.state.snapshot() != next {
            self.state.set(next);
        }
    }
}

// Holds `is_saving` for one save-and-leave; clears it even if the future is dropped.
struct SavingScope<'a, I: NavigationInterceptor, U: UnloadPrompt> {
    guard: &'a NavigationGuard<I, U>,
}

impl<'a, I: NavigationInterceptor, U: UnloadPrompt> SavingScope<'a, I, U> {
    fn enter(guard: &'a NavigationGuard<I, U>) -> Self {
        guard.state.update(|s| s.is_saving = true);
        Self { guard }
    }
}

impl<I: NavigationInterceptor, U: UnloadPrompt> Drop for SavingScope<'_, I, U> {
    fn drop(&mut self) {
        self.guard.state.update(|s| s.is_saving = false);
        self.guard.reevaluate();
    }
}

impl<I: NavigationInterceptor, U: UnloadPrompt> Drop for NavigationGuard<I, U> {
    fn drop(&mut self) {
        if std::mem::take(self.unload_installed.get_mut()) {
            self.unload.uninstall();
            tracing::debug!("navigation guard dropped, unload prompt removed");
        }
    }
}

impl<I: NavigationInterceptor, U: UnloadPrompt> fmt::Debug for NavigationGuard<I, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("flags", &self.flags)
            .field("state", &self.state.snapshot())
            .field("unload_installed", &*self.unload_installed.lock())
            .finish_non_exhaustive()
    }
}

//! Task navigation guard
//!
//! Couples one task's [`AutosaveEngine`] with a [`NavigationGuard`]: the
//! guard follows the engine's dirty flag and "save and leave" runs the
//! engine's explicit save.

use crate::guard::{GuardOptions, GuardState, NavigationGuard, Resolution};
use crate::interceptor::{BlockerState, NavigationInterceptor, UnloadPrompt};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Weak};
use tether_autosave::{AutosaveEngine, AutosaveSnapshot, Draft, DraftStore, SaveStatus};
use tether_core::{GuardConfig, SaveError, Subscription};

/// Autosave engine guarded against navigation while dirty
pub struct TaskNavigationGuard<S, I, U>
where
    S: DraftStore + 'static,
    I: NavigationInterceptor + 'static,
    U: UnloadPrompt + 'static,
{
    // Declared first so it detaches before the engine flushes on drop.
    _dirty_sync: Subscription,
    guard: Arc<NavigationGuard<I, U>>,
    engine: AutosaveEngine<S>,
}

impl<S, I, U> TaskNavigationGuard<S, I, U>
where
    S: DraftStore + 'static,
    I: NavigationInterceptor + 'static,
    U: UnloadPrompt + 'static,
{
    /// Guard `engine` through the host's interceptor and unload prompt
    pub fn new(engine: AutosaveEngine<S>, interceptor: I, unload: U, config: &GuardConfig) -> Self {
        let options = GuardOptions::new(*config).with_save(engine.save_action());
        let guard = Arc::new(NavigationGuard::new(interceptor, unload, options));
        guard.set_dirty(engine.is_dirty());

        let weak: Weak<NavigationGuard<I, U>> = Arc::downgrade(&guard);
        let dirty_sync = engine.subscribe(move |snapshot: &AutosaveSnapshot| {
            if let Some(guard) = weak.upgrade() {
                if guard.is_dirty() != snapshot.is_dirty {
                    guard.set_dirty(snapshot.is_dirty);
                }
            }
        });

        tracing::debug!(
            task = %engine.task_id(),
            enabled = config.enabled,
            "task navigation guard attached"
        );

        Self {
            _dirty_sync: dirty_sync,
            guard,
            engine,
        }
    }

    /// The guarded engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &AutosaveEngine<S> {
        &self.engine
    }

    /// The navigation guard
    #[inline]
    #[must_use]
    pub fn guard(&self) -> &NavigationGuard<I, U> {
        &self.guard
    }

    /// See [`AutosaveEngine::update_draft`]
    pub fn update_draft(&self, partial: Draft) {
        self.engine.update_draft(partial);
    }

    /// See [`AutosaveEngine::update_field`]
    pub fn update_field(&self, field: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.engine.update_field(field, value);
    }

    /// See [`AutosaveEngine::save_now`]
    ///
    /// # Errors
    /// The store's [`SaveError`]
    pub async fn save_now(&self) -> Result<(), SaveError> {
        self.engine.save_now().await
    }

    /// Engine state
    #[must_use]
    pub fn snapshot(&self) -> AutosaveSnapshot {
        self.engine.snapshot()
    }

    /// Save lifecycle
    #[must_use]
    pub fn status(&self) -> SaveStatus {
        self.engine.status()
    }

    /// Listen for engine state changes
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&AutosaveSnapshot) + Send + Sync + 'static,
    ) -> Subscription {
        self.engine.subscribe(listener)
    }

    /// Server time of the last successful save
    #[must_use]
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.engine.last_saved_at()
    }

    /// Last save failure message
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.engine.error()
    }

    /// Current merged draft
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.engine.draft()
    }

    /// Whether the draft has unsaved changes
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.engine.is_dirty()
    }

    /// Guard state
    #[must_use]
    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    /// Listen for guard state changes, e.g. to show a spinner while saving
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe_guard(
        &self,
        listener: impl Fn(&GuardState) + Send + Sync + 'static,
    ) -> Subscription {
        self.guard.subscribe(listener)
    }

    /// Host interception state
    #[must_use]
    pub fn blocker_state(&self) -> BlockerState {
        self.guard.blocker_state()
    }

    /// Whether "save and leave" is in progress
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.guard.is_saving()
    }

    /// Whether navigation is being intercepted
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_active()
    }

    /// Turn interception on or off
    pub fn set_enabled(&self, enabled: bool) {
        self.guard.set_enabled(enabled);
    }

    /// Stay on the page
    pub fn on_cancel(&self) -> Resolution {
        self.guard.on_cancel()
    }

    /// Leave, discarding unsaved changes
    pub fn on_confirm_leave(&self) -> Resolution {
        self.guard.on_confirm_leave()
    }

    /// Save the draft, then leave if that worked
    ///
    /// # Errors
    /// The store's [`SaveError`]; navigation stays blocked
    pub async fn on_save_and_leave(&self) -> Result<Resolution, SaveError> {
        self.guard.on_save_and_leave().await
    }
}

impl<S, I, U> fmt::Debug for TaskNavigationGuard<S, I, U>
where
    S: DraftStore + 'static,
    I: NavigationInterceptor + 'static,
    U: UnloadPrompt + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNavigationGuard")
            .field("engine", &self.engine)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

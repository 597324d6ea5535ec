//! Draft autosave engine
//!
//! Owns the draft of one task while it is being edited:
//! - merges incremental field updates into the draft
//! - persists automatically once edits go quiet for the debounce window
//! - persists immediately on [`AutosaveEngine::save_now`]
//! - skips any save whose content hash equals the last persisted one
//! - flushes a dirty draft, fire-and-forget, when dropped
//!
//! Failed saves are not retried. The draft stays dirty and the next edit or
//! explicit save tries again.

use crate::draft::{Draft, TaskId};
use crate::hash::ContentHash;
use crate::store::{DraftStore, SaveDraftRequest};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use tether_core::{
    action, AsyncAction, AutosaveConfig, Debounced, SaveError, Store, Subscription,
};

/// Save lifecycle as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// Nothing in flight; edits may be pending
    #[default]
    Idle,
    /// A persistence call is in flight
    Saving,
    /// The last call succeeded
    Saved,
    /// The last call failed
    Error,
}

/// Observable engine state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutosaveSnapshot {
    /// Save lifecycle
    pub status: SaveStatus,
    /// Server time of the last successful save
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Message of the last failure, cleared by the next edit or save attempt
    pub error: Option<String>,
    /// Current merged draft
    pub draft: Draft,
    /// Whether the draft differs from what was last persisted
    pub is_dirty: bool,
}

/// Which path issued a persistence attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Debounce,
    Explicit,
    Flush,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debounce => "debounce",
            Self::Explicit => "explicit",
            Self::Flush => "flush",
        })
    }
}

fn seed_hash(draft: &Draft) -> ContentHash {
    ContentHash::compute_serializable(draft).unwrap_or_else(|_| ContentHash::compute(b""))
}

struct EngineInner<S> {
    task_id: TaskId,
    business_id: Mutex<Option<String>>,
    store: S,
    state: Store<AutosaveSnapshot>,
    last_saved_hash: Mutex<ContentHash>,
}

impl<S: DraftStore> EngineInner<S> {
    async fn save_now(&self) -> Result<(), SaveError> {
        let draft = self.state.with(|s| s.draft.clone());
        self.persist(draft, Trigger::Explicit).await
    }

    async fn persist(&self, draft: Draft, trigger: Trigger) -> Result<(), SaveError> {
        let hash = ContentHash::compute_serializable(&draft)?;
        if hash == *self.last_saved_hash.lock() {
            tracing::debug!(
                task = %self.task_id,
                %trigger,
                hash = %hash.short(),
                "draft unchanged, save skipped"
            );
            // Edits that returned to the persisted content are not unsaved.
            let reverted = self.state.with(|s| {
                s.is_dirty && ContentHash::compute_serializable(&s.draft).ok() == Some(hash)
            });
            if reverted {
                self.state.update(|s| s.is_dirty = false);
            }
            return Ok(());
        }

        self.state.update(|s| {
            s.status = SaveStatus::Saving;
            s.error = None;
        });

        let request = SaveDraftRequest {
            task_id: self.task_id.clone(),
            draft,
            business_id: self.business_id.lock().clone(),
        };

        match self.store.save_draft(&request).await {
            Ok(receipt) => {
                *self.last_saved_hash.lock() = hash;
                self.state.update(|s| {
                    s.status = SaveStatus::Saved;
                    s.last_saved_at = Some(receipt.saved_at);
                    s.error = None;
                    // Edits made while the call was in flight keep the draft dirty.
                    if ContentHash::compute_serializable(&s.draft).ok() == Some(hash) {
                        s.is_dirty = false;
                    }
                });
                tracing::info!(
                    task = %self.task_id,
                    %trigger,
                    hash = %hash.short(),
                    saved_at = %receipt.saved_at,
                    "draft saved"
                );
                Ok(())
            }
            Err(e) => {
                self.state.update(|s| {
                    s.status = SaveStatus::Error;
                    s.error = Some(e.to_string());
                });
                tracing::warn!(task = %self.task_id, %trigger, error = %e, "draft save failed");
                Err(e)
            }
        }
    }
}

/// Debounced, deduplicating draft persistence for one task
///
/// Must be created and used inside a Tokio runtime.
pub struct AutosaveEngine<S: DraftStore + 'static> {
    inner: Arc<EngineInner<S>>,
    debounced: Debounced<Draft>,
    _autosave: Subscription,
}

impl<S: DraftStore + 'static> AutosaveEngine<S> {
    /// Create an engine with an empty draft
    pub fn new(task_id: impl Into<TaskId>, store: S, config: &AutosaveConfig) -> Self {
        let inner = Arc::new(EngineInner {
            task_id: task_id.into(),
            business_id: Mutex::new(None),
            store,
            state: Store::new(AutosaveSnapshot::default()),
            last_saved_hash: Mutex::new(seed_hash(&Draft::new())),
        });

        let debounced = Debounced::new(Draft::new(), config.debounce());
        let weak: Weak<EngineInner<S>> = Arc::downgrade(&inner);
        let autosave = debounced.subscribe(move |draft: &Draft| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let draft = draft.clone();
            tokio::spawn(async move {
                // Logged inside persist; the debounced path never propagates.
                let _ = inner.persist(draft, Trigger::Debounce).await;
            });
        });

        tracing::debug!(
            task = %inner.task_id,
            window = ?config.debounce(),
            "autosave engine created"
        );

        Self {
            inner,
            debounced,
            _autosave: autosave,
        }
    }

    /// Scope every save to a business
    #[must_use]
    pub fn with_business_id(self, business_id: impl Into<String>) -> Self {
        *self.inner.business_id.lock() = Some(business_id.into());
        self
    }

    /// Seed the draft with content the server already has
    ///
    /// The seed counts as persisted: the engine stays clean and a save with
    /// unchanged content is skipped.
    #[must_use]
    pub fn with_initial_draft(self, initial: Draft) -> Self {
        *self.inner.last_saved_hash.lock() = seed_hash(&initial);
        self.inner.state.update(|s| {
            s.draft = initial;
            s.is_dirty = false;
        });
        self
    }

    /// Shallow-merge `partial` into the draft
    ///
    /// Marks the draft dirty, resets the status to `Idle` (clearing any
    /// error) and restarts the debounce window.
    pub fn update_draft(&self, partial: Draft) {
        let merged = self.inner.state.update(|s| {
            s.draft.merge(partial);
            s.is_dirty = true;
            s.status = SaveStatus::Idle;
            s.error = None;
            s.draft.clone()
        });
        self.debounced.set(merged);
    }

    /// Set a single field
    pub fn update_field(&self, field: impl Into<String>, value: impl Into<Value>) {
        self.update_draft(Draft::new().with(field, value));
    }

    /// Persist the current draft immediately
    ///
    /// Resolves `Ok` without a network call when the content equals the last
    /// persisted content.
    ///
    /// # Errors
    /// The store's [`SaveError`]; the engine stays usable and dirty
    pub async fn save_now(&self) -> Result<(), SaveError> {
        self.inner.save_now().await
    }

    /// [`AutosaveEngine::save_now`] as a shareable action
    ///
    /// The action keeps the engine state alive but does not keep the engine
    /// itself (or its flush-on-drop) alive.
    #[must_use]
    pub fn save_action(&self) -> AsyncAction<SaveError> {
        let inner = Arc::clone(&self.inner);
        action(move || {
            let inner = Arc::clone(&inner);
            async move { inner.save_now().await }
        })
    }

    /// Task this engine edits
    #[inline]
    #[must_use]
    pub fn task_id(&self) -> &TaskId {
        &self.inner.task_id
    }

    /// Full observable state
    #[must_use]
    pub fn snapshot(&self) -> AutosaveSnapshot {
        self.inner.state.snapshot()
    }

    /// Listen for state changes
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&AutosaveSnapshot) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.state.subscribe(listener)
    }

    /// Save lifecycle
    #[must_use]
    pub fn status(&self) -> SaveStatus {
        self.inner.state.with(|s| s.status)
    }

    /// Server time of the last successful save
    #[must_use]
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.with(|s| s.last_saved_at)
    }

    /// Last failure message
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.with(|s| s.error.clone())
    }

    /// Current merged draft
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.inner.state.with(|s| s.draft.clone())
    }

    /// Whether the draft differs from what was last persisted
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.state.with(|s| s.is_dirty)
    }

    /// Whether an automatic save is waiting for the quiet window to end
    #[must_use]
    pub fn has_pending_autosave(&self) -> bool {
        self.debounced.is_pending()
    }
}

impl<S: DraftStore + 'static> Drop for AutosaveEngine<S> {
    fn drop(&mut self) {
        self.debounced.dispose();

        let (dirty, draft) = self.inner.state.with(|s| (s.is_dirty, s.draft.clone()));
        if !dirty {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!(task = %self.inner.task_id, "flushing dirty draft on teardown");
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    let _ = inner.persist(draft, Trigger::Flush).await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    task = %self.inner.task_id,
                    "dirty draft dropped outside a runtime; not flushed"
                );
            }
        }
    }
}

impl<S: DraftStore + 'static> fmt::Debug for AutosaveEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutosaveEngine")
            .field("task_id", &self.inner.task_id)
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

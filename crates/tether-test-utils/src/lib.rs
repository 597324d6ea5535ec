//! Testing utilities for the Tether workspace
//!
//! Recording doubles for the store and haptics boundaries, canned actions,
//! and fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tether_autosave::{Draft, DraftStore, SaveDraftRequest, SaveReceipt};
use tether_core::{action, SaveError};
use tether_gesture::{HapticPulse, Haptics, RefreshAction};
use tokio::sync::Notify;

pub use tether_core::telemetry::init_test_tracing as init_tracing;

/// Timestamp every [`RecordingDraftStore`] acknowledgement carries
pub fn fixed_saved_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
}

/// Draft store that records every request
///
/// Succeeds by default. Failures are queued with [`fail_next`] or made
/// permanent with [`fail_always`].
///
/// [`fail_next`]: RecordingDraftStore::fail_next
/// [`fail_always`]: RecordingDraftStore::fail_always
#[derive(Debug, Default)]
pub struct RecordingDraftStore {
    requests: Mutex<Vec<SaveDraftRequest>>,
    queued_failures: Mutex<VecDeque<SaveError>>,
    permanent_failure: Mutex<Option<SaveError>>,
    latency: Mutex<Option<Duration>>,
}

impl RecordingDraftStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call waits `latency` before answering
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    pub fn fail_next(&self, error: SaveError) {
        self.queued_failures.lock().push_back(error);
    }

    pub fn fail_always(&self, error: SaveError) {
        *self.permanent_failure.lock() = Some(error);
    }

    pub fn succeed(&self) {
        self.queued_failures.lock().clear();
        *self.permanent_failure.lock() = None;
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<SaveDraftRequest> {
        self.requests.lock().clone()
    }

    pub fn last_draft(&self) -> Option<Draft> {
        self.requests.lock().last().map(|r| r.draft.clone())
    }
}

#[async_trait]
impl DraftStore for RecordingDraftStore {
    async fn save_draft(&self, request: &SaveDraftRequest) -> Result<SaveReceipt, SaveError> {
        self.requests.lock().push(request.clone());

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let queued = self.queued_failures.lock().pop_front();
        if let Some(error) = queued {
            return Err(error);
        }
        if let Some(error) = self.permanent_failure.lock().clone() {
            return Err(error);
        }
        Ok(SaveReceipt {
            saved_at: fixed_saved_at(),
        })
    }
}

/// Haptics that remember every pulse
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    pulses: Mutex<Vec<HapticPulse>>,
}

impl RecordingHaptics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pulses(&self) -> Vec<HapticPulse> {
        self.pulses.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.pulses.lock().len()
    }
}

impl Haptics for RecordingHaptics {
    fn pulse(&self, pulse: HapticPulse) {
        self.pulses.lock().push(pulse);
    }
}

/// Invocation counter shared with a canned action
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Refresh that resolves immediately
pub fn resolving_refresh(counter: &CallCounter) -> RefreshAction {
    let counter = counter.clone();
    action(move || {
        counter.hit();
        async { Ok(()) }
    })
}

/// Refresh that rejects immediately
pub fn rejecting_refresh(counter: &CallCounter) -> RefreshAction {
    let counter = counter.clone();
    action(move || {
        counter.hit();
        async { Err(anyhow::anyhow!("feed unavailable")) }
    })
}

/// Refresh that stays pending until `gate` is notified
pub fn gated_refresh(counter: &CallCounter, gate: Arc<Notify>) -> RefreshAction {
    let counter = counter.clone();
    action(move || {
        counter.hit();
        let gate = Arc::clone(&gate);
        async move {
            gate.notified().await;
            Ok(())
        }
    })
}

/// Let spawned tasks run to their next suspension point
///
/// Under a paused clock this also fires every timer due now.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Draft with a title and notes
pub fn sample_draft() -> Draft {
    Draft::new()
        .with("title", "Quarterly filing")
        .with("notes", serde_json::json!({ "status": "waiting on receipts" }))
}

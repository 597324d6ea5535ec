//! Pull-to-refresh recognizer
//!
//! A downward pull that starts while the scroll container is at its top is
//! damped by `resistance`, capped at `max_pull`, and commits on release
//! once the damped distance reaches `threshold`. Committing pulses haptics
//! and runs the refresh action; the indicator stays pinned at `threshold`
//! until the action settles, then everything resets to zero.

use crate::haptics::{HapticPulse, Haptics};
use crate::{progress, MoveOutcome};
use parking_lot::Mutex;
use std::fmt;
use tether_core::{AsyncAction, PullToRefreshConfig, Store, Subscription};

/// Refresh callback run on commit
pub type RefreshAction = AsyncAction<anyhow::Error>;

/// Observable pull-to-refresh state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PullState {
    /// Damped pull distance, `0..=max_pull`
    pub distance: f64,
    /// `distance / threshold`, clamped to `[0, 1]`
    pub progress: f64,
    /// A downward pull is being tracked
    pub is_pulling: bool,
    /// The refresh action is running
    pub is_refreshing: bool,
}

impl PullState {
    /// Resting state
    pub const ZERO: Self = Self {
        distance: 0.0,
        progress: 0.0,
        is_pulling: false,
        is_refreshing: false,
    };
}

/// Result of releasing the finger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// No pull was being tracked (disabled, not at top, or refreshing)
    Ignored,
    /// Released below threshold; nothing ran
    Released,
    /// Refresh action resolved
    Refreshed,
    /// Refresh action failed; state was reset anyway
    RefreshFailed(String),
}

/// Damped distance for a raw downward delta
#[must_use]
pub fn pull_distance(config: &PullToRefreshConfig, delta: f64) -> f64 {
    if !delta.is_finite() || delta <= 0.0 {
        return 0.0;
    }
    (delta / config.resistance).min(config.max_pull)
}

#[derive(Debug)]
struct Session {
    enabled: bool,
    start_y: Option<f64>,
    // Guards re-entry independently of the displayed state, which a
    // disable may already have reset.
    refreshing: bool,
    state: PullState,
}

/// Pull-to-refresh gesture state machine
pub struct PullToRefresh<H> {
    config: PullToRefreshConfig,
    haptics: H,
    on_refresh: RefreshAction,
    session: Mutex<Session>,
    state: Store<PullState>,
}

impl<H: Haptics> PullToRefresh<H> {
    /// Create an enabled recognizer
    pub fn new(config: PullToRefreshConfig, haptics: H, on_refresh: RefreshAction) -> Self {
        Self {
            config,
            haptics,
            on_refresh,
            session: Mutex::new(Session {
                enabled: true,
                start_y: None,
                refreshing: false,
                state: PullState::ZERO,
            }),
            state: Store::new(PullState::ZERO),
        }
    }

    /// Finger down at `y` while the container is scrolled to `scroll_top`
    ///
    /// The sequence is only tracked when the container is at its top.
    pub fn touch_start(&self, y: f64, scroll_top: f64) {
        let next = {
            let mut s = self.session.lock();
            if !s.enabled || s.refreshing {
                tracing::trace!("pull touchstart ignored");
                return;
            }
            s.start_y = (scroll_top <= self.config.top_tolerance).then_some(y);
            s.state = PullState::ZERO;
            s.state
        };
        self.state.set(next);
    }

    /// Finger moved to `y`
    pub fn touch_move(&self, y: f64) -> MoveOutcome {
        let (next, outcome) = {
            let mut s = self.session.lock();
            if !s.enabled || s.refreshing {
                return MoveOutcome::PASS;
            }
            let Some(start_y) = s.start_y else {
                return MoveOutcome::PASS;
            };

            let delta = y - start_y;
            if !delta.is_finite() || delta <= 0.0 {
                // Pulling back up cancels the pull instead of going negative.
                s.state = PullState::ZERO;
                (s.state, MoveOutcome::PASS)
            } else {
                let distance = pull_distance(&self.config, delta);
                s.state = PullState {
                    distance,
                    progress: progress(distance, self.config.threshold),
                    is_pulling: true,
                    is_refreshing: false,
                };
                (s.state, MoveOutcome::CAPTURE)
            }
        };
        self.state.set(next);
        outcome
    }

    /// Finger lifted
    ///
    /// Runs the refresh action when the pull reached the threshold and
    /// resolves once it settles.
    pub async fn touch_end(&self) -> PullOutcome {
        let (next, commit) = {
            let mut s = self.session.lock();
            if !s.enabled || s.refreshing {
                return PullOutcome::Ignored;
            }
            if s.start_y.take().is_none() {
                return PullOutcome::Ignored;
            }

            let commit = s.state.progress >= 1.0;
            s.state = if commit {
                s.refreshing = true;
                PullState {
                    distance: self.config.threshold,
                    progress: 1.0,
                    is_pulling: false,
                    is_refreshing: true,
                }
            } else {
                PullState::ZERO
            };
            (s.state, commit)
        };
        self.state.set(next);

        if !commit {
            return PullOutcome::Released;
        }

        tracing::debug!("pull-to-refresh committed");
        self.haptics.pulse(HapticPulse::Light);
        let reset = RefreshReset { pull: self };
        let result = (self.on_refresh)().await;
        drop(reset);

        match result {
            Ok(()) => PullOutcome::Refreshed,
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                PullOutcome::RefreshFailed(e.to_string())
            }
        }
    }

    fn finish_refresh(&self) {
        {
            let mut s = self.session.lock();
            s.refreshing = false;
            s.state = PullState::ZERO;
        }
        self.state.set(PullState::ZERO);
    }

    /// Touch sequence interrupted by the platform
    pub fn touch_cancel(&self) {
        {
            let mut s = self.session.lock();
            if s.refreshing {
                return;
            }
            s.start_y = None;
            s.state = PullState::ZERO;
        }
        self.state.set(PullState::ZERO);
    }

    /// Enable or disable the recognizer
    ///
    /// Disabling resets the state and drops any tracked sequence.
    pub fn set_enabled(&self, enabled: bool) {
        {
            let mut s = self.session.lock();
            s.enabled = enabled;
            if enabled {
                return;
            }
            s.start_y = None;
            s.state = PullState::ZERO;
        }
        self.state.set(PullState::ZERO);
    }

    /// Whether input is being processed
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.session.lock().enabled
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> PullState {
        self.state.snapshot()
    }

    /// Listen for state changes
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&PullState) + Send + Sync + 'static) -> Subscription {
        self.state.subscribe(listener)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PullToRefreshConfig {
        &self.config
    }
}

// Clears the refreshing state when the refresh settles or its future is dropped.
struct RefreshReset<'a, H: Haptics> {
    pull: &'a PullToRefresh<H>,
}

impl<H: Haptics> Drop for RefreshReset<'_, H> {
    fn drop(&mut self) {
        self.pull.finish_refresh();
    }
}

impl<H> fmt::Debug for PullToRefresh<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullToRefresh")
            .field("config", &self.config)
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(threshold: f64, max_pull: f64, resistance: f64) -> PullToRefreshConfig {
        PullToRefreshConfig::default()
            .with_threshold(threshold)
            .with_max_pull(max_pull)
            .with_resistance(resistance)
    }

    #[test]
    fn distance_is_damped_by_resistance() {
        assert_eq!(pull_distance(&cfg(80.0, 120.0, 1.0), 50.0), 50.0);
        assert_eq!(pull_distance(&cfg(80.0, 120.0, 2.0), 100.0), 50.0);
        assert_eq!(pull_distance(&PullToRefreshConfig::default(), 100.0), 40.0);
    }

    #[test]
    fn distance_is_capped_at_max_pull() {
        assert_eq!(pull_distance(&cfg(80.0, 100.0, 1.0), 250.0), 100.0);
    }

    #[test]
    fn upward_delta_has_no_distance() {
        assert_eq!(pull_distance(&PullToRefreshConfig::default(), -30.0), 0.0);
        assert_eq!(pull_distance(&PullToRefreshConfig::default(), 0.0), 0.0);
    }

    #[test]
    fn non_finite_delta_has_no_distance() {
        let config = PullToRefreshConfig::default();
        assert_eq!(pull_distance(&config, f64::NAN), 0.0);
        assert_eq!(pull_distance(&config, f64::INFINITY), 0.0);
    }
}

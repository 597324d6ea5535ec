//! Directional swipe recognizer
//!
//! The first movement past `lock_distance` locks the sequence to the axis
//! with the larger delta. A horizontal lock captures the rest of the
//! sequence so the page does not scroll underneath; a vertical lock leaves
//! it to the page entirely. Only motion in the configured direction moves
//! the offset, capped at `threshold * overshoot`. Releasing at full
//! progress fires the completion callback exactly once.

use crate::haptics::{HapticPulse, Haptics};
use crate::{progress, MoveOutcome};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tether_core::{Store, Subscription, SwipeConfig, SwipeDirection};

/// Completion callback, fire-and-forget
pub type CompletionFn = Arc<dyn Fn() + Send + Sync>;

/// Observable swipe state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeState {
    /// Signed horizontal offset, `-max..=max`
    pub offset: f64,
    /// `|offset| / threshold`, clamped to `[0, 1]`
    pub progress: f64,
    /// A horizontal swipe is being tracked
    pub is_swiping: bool,
}

impl SwipeState {
    /// Resting state
    pub const ZERO: Self = Self {
        offset: 0.0,
        progress: 0.0,
        is_swiping: false,
    };
}

/// Result of releasing the finger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// No sequence was being tracked
    Ignored,
    /// Released short of the threshold
    Cancelled,
    /// Completion callback fired
    Completed(SwipeDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug)]
struct Session {
    enabled: bool,
    start: Option<(f64, f64)>,
    axis: Option<Axis>,
    state: SwipeState,
}

/// Swipe gesture state machine
pub struct Swipe<H> {
    config: SwipeConfig,
    haptics: H,
    on_complete: CompletionFn,
    session: Mutex<Session>,
    state: Store<SwipeState>,
}

impl<H: Haptics> Swipe<H> {
    /// Create an enabled recognizer
    pub fn new(config: SwipeConfig, haptics: H, on_complete: CompletionFn) -> Self {
        Self {
            config,
            haptics,
            on_complete,
            session: Mutex::new(Session {
                enabled: true,
                start: None,
                axis: None,
                state: SwipeState::ZERO,
            }),
            state: Store::new(SwipeState::ZERO),
        }
    }

    /// Finger down at `(x, y)`
    pub fn touch_start(&self, x: f64, y: f64) {
        {
            let mut s = self.session.lock();
            if !s.enabled {
                return;
            }
            s.start = Some((x, y));
            s.axis = None;
            s.state = SwipeState::ZERO;
        }
        self.state.set(SwipeState::ZERO);
    }

    /// Finger moved to `(x, y)`
    pub fn touch_move(&self, x: f64, y: f64) -> MoveOutcome {
        let next = {
            let mut s = self.session.lock();
            if !s.enabled {
                return MoveOutcome::PASS;
            }
            let Some((start_x, start_y)) = s.start else {
                return MoveOutcome::PASS;
            };

            let dx = x - start_x;
            let dy = y - start_y;

            let axis = match s.axis {
                Some(axis) => axis,
                None => {
                    let lock = self.config.lock_distance;
                    if dx.abs() <= lock && dy.abs() <= lock {
                        return MoveOutcome::PASS;
                    }
                    let axis = if dx.abs() > dy.abs() {
                        Axis::Horizontal
                    } else {
                        Axis::Vertical
                    };
                    tracing::trace!(?axis, "swipe axis locked");
                    s.axis = Some(axis);
                    axis
                }
            };

            if axis == Axis::Vertical {
                return MoveOutcome::PASS;
            }

            let max = self.config.max_offset();
            let offset = self.config.direction.contribution(dx).clamp(-max, max);
            s.state = SwipeState {
                offset,
                progress: progress(offset, self.config.threshold),
                is_swiping: true,
            };
            s.state
        };
        self.state.set(next);
        MoveOutcome::CAPTURE
    }

    /// Finger lifted
    pub fn touch_end(&self) -> SwipeOutcome {
        let committed = {
            let mut s = self.session.lock();
            if !s.enabled || s.start.take().is_none() {
                return SwipeOutcome::Ignored;
            }
            let committed = s.state.progress >= 1.0;
            s.axis = None;
            s.state = SwipeState::ZERO;
            committed
        };
        self.state.set(SwipeState::ZERO);

        if !committed {
            return SwipeOutcome::Cancelled;
        }

        tracing::debug!(direction = ?self.config.direction, "swipe completed");
        self.haptics.pulse(HapticPulse::Medium);
        (self.on_complete)();
        SwipeOutcome::Completed(self.config.direction)
    }

    /// Touch sequence interrupted by the platform
    pub fn touch_cancel(&self) {
        {
            let mut s = self.session.lock();
            s.start = None;
            s.axis = None;
            s.state = SwipeState::ZERO;
        }
        self.state.set(SwipeState::ZERO);
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
            s.start = None;
            s.axis = None;
            s.state = SwipeState::ZERO;
        }
        self.state.set(SwipeState::ZERO);
    }

    /// Whether input is being processed
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.session.lock().enabled
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SwipeState {
        self.state.snapshot()
    }

    /// Listen for state changes
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&SwipeState) + Send + Sync + 'static,
    ) -> Subscription {
        self.state.subscribe(listener)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }
}

impl<H> fmt::Debug for Swipe<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Swipe")
            .field("config", &self.config)
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

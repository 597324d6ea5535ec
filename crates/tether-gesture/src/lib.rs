//! Tether Gesture - touch gesture recognizers
//!
//! Turn continuous touch coordinates into bounded progress and a single
//! commit decision:
//! - [`PullToRefresh`]: vertical pull at the top of a scroll container,
//!   runs an async refresh action
//! - [`Swipe`]: horizontal swipe in one configured direction, runs a
//!   completion callback
//!
//! Both expose their state through a [`tether_core::Store`], reset to zero
//! at the start and end of every touch sequence, and ignore input while
//! disabled.

#![warn(unreachable_pub)]

pub mod haptics;
pub mod pull;
pub mod swipe;

pub use haptics::{HapticPulse, Haptics, NoHaptics};
pub use pull::{PullOutcome, PullState, PullToRefresh, RefreshAction};
pub use swipe::{CompletionFn, Swipe, SwipeOutcome, SwipeState};

/// What the host should do with the native touchmove event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Call `preventDefault` so the page does not scroll as well
    pub suppress_scroll: bool,
}

impl MoveOutcome {
    pub(crate) const PASS: Self = Self {
        suppress_scroll: false,
    };
    pub(crate) const CAPTURE: Self = Self {
        suppress_scroll: true,
    };
}

/// Largest `f64` strictly below 1
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Completion fraction of `value` against `threshold`, clamped to `[0, 1]`
///
/// Exactly 1 iff `value >= threshold`.
#[must_use]
pub fn progress(value: f64, threshold: f64) -> f64 {
    let value = value.abs();
    if value >= threshold {
        1.0
    } else {
        (value / threshold).min(BELOW_ONE)
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

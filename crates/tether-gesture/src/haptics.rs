//! Best-effort haptic feedback
//!
//! Recognizers pulse once when a gesture commits. Devices without a
//! vibration motor use [`NoHaptics`].

use std::sync::Arc;
use std::time::Duration;

/// Strength of a feedback pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPulse {
    /// Short tick (pull-to-refresh commit)
    Light,
    /// Firmer tick (swipe completion)
    Medium,
}

impl HapticPulse {
    /// Vibration length for hosts that only take a duration
    #[inline]
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Light => Duration::from_millis(10),
            Self::Medium => Duration::from_millis(20),
        }
    }
}

/// Device vibration capability
///
/// Implementations must not fail or block; unsupported hardware ignores
/// the call.
pub trait Haptics: Send + Sync {
    /// Fire one pulse
    fn pulse(&self, pulse: HapticPulse);
}

impl<H: Haptics + ?Sized> Haptics for Arc<H> {
    fn pulse(&self, pulse: HapticPulse) {
        (**self).pulse(pulse);
    }
}

/// Haptics for devices without a vibration motor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self, pulse: HapticPulse) {
        tracing::trace!(?pulse, "haptics unavailable");
    }
}

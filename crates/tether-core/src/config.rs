//! Configuration for autosave, navigation guards and gestures
//!
//! Every section has working defaults; a TOML document only needs to name
//! the values it overrides:
//!
//! ```toml
//! [autosave]
//! debounce_ms = 5000
//!
//! [pull_to_refresh]
//! threshold = 64.0
//!
//! [swipe]
//! direction = "right"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Full Tether configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Draft autosave engine
    pub autosave: AutosaveConfig,
    /// Navigation guard
    pub guard: GuardConfig,
    /// Pull-to-refresh recognizer
    pub pull_to_refresh: PullToRefreshConfig,
    /// Swipe recognizer
    pub swipe: SwipeConfig,
}

impl TetherConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - `ConfigError::Parse` if the document does not match the schema
    /// - `ConfigError::Invalid` if a value is out of range
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    ///
    /// # Errors
    /// Returns the first out-of-range value found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.autosave.validate()?;
        self.pull_to_refresh.validate()?;
        self.swipe.validate()
    }
}

/// Autosave engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before an automatic save, in ms
    pub debounce_ms: u64,
}

impl AutosaveConfig {
    /// Quiet period as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// With debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::invalid(
                "autosave.debounce_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 30_000 }
    }
}

/// Navigation guard settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Whether the guard intercepts at all
    pub enabled: bool,
}

impl GuardConfig {
    /// With enabled flag
    #[inline]
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Pull-to-refresh settings (all distances in CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullToRefreshConfig {
    /// Damped distance at which a release commits
    pub threshold: f64,
    /// Upper bound on the damped distance
    pub max_pull: f64,
    /// Divisor applied to the raw finger delta
    pub resistance: f64,
    /// Largest container scroll offset still considered "at top"
    pub top_tolerance: f64,
}

impl PullToRefreshConfig {
    /// With threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// With max pull
    #[inline]
    #[must_use]
    pub fn with_max_pull(mut self, max_pull: f64) -> Self {
        self.max_pull = max_pull;
        self
    }

    /// With resistance
    #[inline]
    #[must_use]
    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = resistance;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0) {
            return Err(ConfigError::invalid(
                "pull_to_refresh.threshold",
                "must be positive",
            ));
        }
        if !(self.max_pull > 0.0) {
            return Err(ConfigError::invalid(
                "pull_to_refresh.max_pull",
                "must be positive",
            ));
        }
        if !(self.resistance > 0.0) {
            return Err(ConfigError::invalid(
                "pull_to_refresh.resistance",
                "must be positive",
            ));
        }
        if self.top_tolerance < 0.0 {
            return Err(ConfigError::invalid(
                "pull_to_refresh.top_tolerance",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

impl Default for PullToRefreshConfig {
    fn default() -> Self {
        Self {
            threshold: 80.0,
            max_pull: 120.0,
            resistance: 2.5,
            top_tolerance: 1.0,
        }
    }
}

/// Horizontal direction a swipe completes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Finger moves toward negative x
    #[default]
    Left,
    /// Finger moves toward positive x
    Right,
}

impl SwipeDirection {
    /// Portion of a signed horizontal delta that counts toward this direction
    #[inline]
    #[must_use]
    pub fn contribution(self, delta: f64) -> f64 {
        match self {
            Self::Left => delta.min(0.0),
            Self::Right => delta.max(0.0),
        }
    }
}

/// Swipe settings (all distances in CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Direction that completes the swipe
    pub direction: SwipeDirection,
    /// Offset at which a release commits
    pub threshold: f64,
    /// Movement needed in either axis before the gesture locks to an axis
    pub lock_distance: f64,
    /// Offset cap as a multiple of `threshold`
    pub overshoot: f64,
}

impl SwipeConfig {
    /// With direction
    #[inline]
    #[must_use]
    pub fn with_direction(mut self, direction: SwipeDirection) -> Self {
        self.direction = direction;
        self
    }

    /// With threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Largest absolute offset the gesture reports
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.threshold * self.overshoot
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0) {
            return Err(ConfigError::invalid("swipe.threshold", "must be positive"));
        }
        if self.lock_distance < 0.0 {
            return Err(ConfigError::invalid(
                "swipe.lock_distance",
                "must not be negative",
            ));
        }
        if self.overshoot < 1.0 {
            return Err(ConfigError::invalid("swipe.overshoot", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            direction: SwipeDirection::Left,
            threshold: 100.0,
            lock_distance: 10.0,
            overshoot: 1.5,
        }
    }
}

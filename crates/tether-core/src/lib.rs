//! Tether Core - shared primitives for interaction reliability
//!
//! - [`Store`]: observable value with `subscribe` / `snapshot`
//! - [`Debounced`]: trailing-edge value stabilization on Tokio timers
//! - [`AsyncAction`]: shareable async callbacks (save, refresh)
//! - [`TetherConfig`]: TOML-loadable settings for every component
//! - [`SaveError`], [`ConfigError`]: shared error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_core::{Debounced, Store};
//! use std::time::Duration;
//!
//! let query = Debounced::new(String::new(), Duration::from_millis(300));
//! let _sub = query.subscribe(|q| tracing::info!(%q, "search"));
//! query.set("ru".into());
//! query.set("rust".into()); // only "rust" is emitted, 300ms later
//! ```

#![warn(unreachable_pub)]

pub mod action;
pub mod config;
pub mod debounce;
pub mod error;
pub mod store;
pub mod telemetry;

pub use action::{action, AsyncAction};
pub use config::{
    AutosaveConfig, GuardConfig, PullToRefreshConfig, SwipeConfig, SwipeDirection, TetherConfig,
};
pub use debounce::Debounced;
pub use error::{ConfigError, SaveError};
pub use store::{Store, Subscription};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

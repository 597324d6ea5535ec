//! Tether Guard - navigation protection for unsaved drafts
//!
//! - [`NavigationGuard`]: intercepts in-app navigation and page unload while
//!   a draft is dirty, resolved by cancel / leave / save-and-leave
//! - [`TaskNavigationGuard`]: wires a guard to an
//!   [`AutosaveEngine`](tether_autosave::AutosaveEngine)
//! - [`NavigationInterceptor`] / [`UnloadPrompt`]: capabilities the host
//!   provides; [`MemoryRouter`] and [`MemoryUnloadPrompt`] implement them
//!   in memory
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tether_guard::{MemoryRouter, MemoryUnloadPrompt, TaskNavigationGuard};
//!
//! let router = Arc::new(MemoryRouter::new("/tasks/42"));
//! let unload = MemoryUnloadPrompt::new();
//! let guard = TaskNavigationGuard::new(engine, Arc::clone(&router), unload, &config.guard);
//!
//! guard.update_field("title", "Quarterly filing");
//! router.navigate("/inbox"); // Blocked
//! guard.on_save_and_leave().await?;
//! ```

#![warn(unreachable_pub)]

pub mod guard;
pub mod interceptor;
pub mod memory;
pub mod task_guard;

pub use guard::{GuardOptions, GuardState, NavigationGuard, Resolution};
pub use interceptor::{
    BlockPredicate, BlockerState, NavigationAttempt, NavigationInterceptor, UnloadPrompt,
};
pub use memory::{MemoryRouter, MemoryUnloadPrompt, NavigationOutcome, UnloadDecision};
pub use task_guard::TaskNavigationGuard;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Tether Autosave - debounced draft persistence
//!
//! Keeps a task editor's in-progress edits from being lost:
//! - [`AutosaveEngine`] merges edits and saves once they go quiet
//! - [`ContentHash`] deduplicates saves of unchanged content
//! - [`DraftStore`] is the persistence boundary; [`HttpDraftStore`] talks to
//!   `POST /tasks/{taskId}/save`
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_autosave::{AutosaveEngine, HttpDraftStore, HttpStoreConfig};
//! use tether_core::AutosaveConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpDraftStore::new(HttpStoreConfig::new("https://api.example.com/v1"))?;
//! let engine = AutosaveEngine::new("task-42", store, &AutosaveConfig::default());
//!
//! engine.update_field("title", "Quarterly filing");
//! engine.update_field("notes", "waiting on receipts");
//! engine.save_now().await?; // or let the 30s window elapse
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod draft;
pub mod engine;
pub mod hash;
pub mod http;
pub mod store;
pub mod wire;

pub use draft::{Draft, TaskId};
pub use engine::{AutosaveEngine, AutosaveSnapshot, SaveStatus};
pub use hash::ContentHash;
pub use http::{HttpDraftStore, HttpStoreConfig};
pub use store::{DraftStore, SaveDraftRequest, SaveReceipt};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

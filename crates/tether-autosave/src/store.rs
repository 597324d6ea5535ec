//! Persistence boundary for drafts
//!
//! The engine never talks to the network directly; it hands a
//! [`SaveDraftRequest`] to a [`DraftStore`]. [`crate::HttpDraftStore`] is
//! the production implementation.

use crate::draft::{Draft, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tether_core::SaveError;

/// One persistence call
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDraftRequest {
    /// Task the draft belongs to
    pub task_id: TaskId,
    /// Full merged draft content
    pub draft: Draft,
    /// Owning business, when the caller is scoped to one
    pub business_id: Option<String>,
}

/// Server acknowledgement of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    /// When the server recorded the draft
    pub saved_at: DateTime<Utc>,
}

/// Remote draft persistence
///
/// Implementations must treat every call independently: the engine issues
/// at most one call at a time in the common case but does not serialize
/// them, and never cancels one once issued.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Persist the draft
    ///
    /// # Errors
    /// Any [`SaveError`]; the engine keeps the draft dirty
    async fn save_draft(&self, request: &SaveDraftRequest) -> Result<SaveReceipt, SaveError>;
}

#[async_trait]
impl<S: DraftStore + ?Sized> DraftStore for std::sync::Arc<S> {
    async fn save_draft(&self, request: &SaveDraftRequest) -> Result<SaveReceipt, SaveError> {
        (**self).save_draft(request).await
    }
}

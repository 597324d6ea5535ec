//! Caller-supplied asynchronous actions
//!
//! Save, refresh and similar callbacks are handed around as [`AsyncAction`]:
//! a shareable function producing a boxed future. Each invocation is an
//! independent task that is pending until it resolves to `Ok` or rejects
//! with `Err`. Nothing here cancels a running action.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Shareable async callback resolving to `Result<(), E>`
pub type AsyncAction<E> = Arc<dyn Fn() -> BoxFuture<'static, Result<(), E>> + Send + Sync>;

/// Wrap an async closure as an [`AsyncAction`]
///
/// ```rust,ignore
/// let refresh = tether_core::action(|| async { reload_feed().await });
/// ```
pub fn action<E, F, Fut>(f: F) -> AsyncAction<E>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: 'static,
{
    Arc::new(move || -> BoxFuture<'static, Result<(), E>> { Box::pin(f()) })
}

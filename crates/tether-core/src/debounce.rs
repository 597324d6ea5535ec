//! Trailing-edge debounce primitive
//!
//! [`Debounced`] turns a rapidly changing input into a stable derived value:
//! the derived value only changes once `delay` has passed with no new input.
//! Each input restarts the window. There is no leading emission.
//!
//! Timers run on the ambient Tokio runtime, so `set` must be called from
//! within one.

use crate::store::{Store, Subscription};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Pending {
    // Bumped by every `set`; a timer only emits if it is still current.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner<T> {
    output: Store<T>,
    pending: Mutex<Pending>,
    disposed: AtomicBool,
}

impl<T> Inner<T> {
    fn cancel_pending(&self) -> bool {
        let mut pending = self.pending.lock();
        pending.generation = pending.generation.wrapping_add(1);
        match pending.timer.take() {
            Some(timer) => {
                timer.abort();
                true
            }
            None => false,
        }
    }
}

/// Debounced value
///
/// Dropping it disposes the pending timer.
pub struct Debounced<T> {
    delay: Duration,
    inner: Arc<Inner<T>>,
}

impl<T> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a debounced value whose derived value starts at `initial`
    #[must_use]
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            inner: Arc::new(Inner {
                output: Store::new(initial),
                pending: Mutex::new(Pending::default()),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Quiet period before an input becomes the derived value
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Supply a new input, restarting the quiet window
    ///
    /// Ignored after [`Debounced::dispose`].
    pub fn set(&self, value: T) {
        if self.inner.disposed.load(Ordering::Acquire) {
            tracing::debug!("debounced input ignored after dispose");
            return;
        }

        let mut pending = self.inner.pending.lock();
        if let Some(previous) = pending.timer.take() {
            previous.abort();
        }
        pending.generation = pending.generation.wrapping_add(1);
        let generation = pending.generation;

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let delay = self.delay;
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            {
                let mut pending = inner.pending.lock();
                if pending.generation != generation || inner.disposed.load(Ordering::Acquire) {
                    return;
                }
                pending.timer = None;
            }
            inner.output.set(value);
        }));
    }

    /// Current derived value
    #[must_use]
    pub fn value(&self) -> T {
        self.inner.output.snapshot()
    }

    /// Listen for emissions of the derived value
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.inner.output.subscribe(listener)
    }

    /// Whether a quiet window is currently open
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.lock().timer.is_some()
    }

    /// Cancel any pending emission and stop accepting input
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::Release);
        if self.inner.cancel_pending() {
            tracing::debug!("debounce timer cancelled on dispose");
        }
    }

    /// Whether [`Debounced::dispose`] has been called
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.inner.disposed.store(true, Ordering::Release);
        self.inner.cancel_pending();
    }
}

impl<T: fmt::Debug> fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.delay)
            .field("output", &self.inner.output)
            .field("pending", &self.inner.pending.lock().timer.is_some())
            .finish()
    }
}

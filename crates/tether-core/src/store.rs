//! Observable value store
//!
//! [`Store`] is the explicit replacement for ambient reactive state: a
//! cloneable handle to one shared value with a snapshot getter and an
//! observer interface. Any number of components can read the current value
//! and react to changes without global mutable state.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

/// Shared observable value
///
/// Cloning a `Store` yields another handle to the same value.
pub struct Store<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Store<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store holding `initial`
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(initial),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current value
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.shared.value.read().clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.read())
    }

    /// Replace the value and notify listeners
    pub fn set(&self, value: T) {
        *self.shared.value.write() = value;
        self.notify();
    }

    /// Mutate the value in place and notify listeners
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = {
            let mut guard = self.shared.value.write();
            f(&mut guard)
        };
        self.notify();
        out
    }

    /// Register a listener invoked with every new value
    ///
    /// The listener stays attached for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared.listeners.lock().push((id, Arc::new(listener)));

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.listeners.lock().retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Number of attached listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    // Listeners run outside both locks so they may touch this or other stores.
    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self
            .shared
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let value = self.snapshot();
        for listener in listeners {
            listener(&value);
        }
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &*self.shared.value.read())
            .field("listeners", &self.shared.listeners.lock().len())
            .finish()
    }
}

/// Handle that keeps a listener attached
///
/// Detaches on [`Subscription::unsubscribe`] or on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach the listener now
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

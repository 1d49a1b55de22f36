//! Observer registry
//!
//! Listeners are called synchronously, in registration order, on every
//! `notify`. The registry lock is never held while a listener runs, so a
//! listener may subscribe or unsubscribe (itself or others) from inside its
//! callback. A listener removed before its turn in an ongoing notification is
//! skipped.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

fn lock<T>(registry: &Mutex<Registry<T>>) -> MutexGuard<'_, Registry<T>> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("[ObserverRegistry] Mutex poisoned, recovering...");
            poisoned.into_inner()
        }
    }
}

pub struct ObserverRegistry<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for ObserverRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// subscription is unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    pub fn notify(&self, value: &T) {
        let snapshot: Vec<(u64, Listener<T>)> = lock(&self.inner)
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            let still_registered = lock(&self.inner).listeners.iter().any(|(lid, _)| *lid == id);
            if still_registered {
                listener(value);
            }
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to a registered listener. Dropping it unregisters the listener.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unregister the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use leptos::prelude::*;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A single observable cell: holds a value, hands out clones of it and
/// notifies subscribers synchronously whenever it is replaced.
///
/// Cloning a `Store` clones the handle, not the value; every clone reads and
/// writes the same cell.
pub struct Store<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    pending: Mutex<Pending<T>>,
    next_id: AtomicU64,
}

// Notifications waiting to be delivered. Only the outermost `set` drains the
// queue, so a `set` issued from inside a callback is delivered after the
// notifications already in flight.
struct Pending<T> {
    queue: VecDeque<(u64, Arc<T>)>,
    draining: bool,
}

fn lock<U>(mutex: &Mutex<U>) -> MutexGuard<'_, U> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
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
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("value", &*value)
            .field("subscribers", &lock(&self.inner.subscribers).len())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                subscribers: Mutex::new(Vec::new()),
                pending: Mutex::new(Pending {
                    queue: VecDeque::new(),
                    draining: false,
                }),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Runs `f` against the current value without cloning it.
    ///
    /// `f` must not write to this same store; the value is read-locked while
    /// it runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self
            .inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&value)
    }

    /// Replaces the value and notifies every subscriber with it.
    pub fn set(&self, value: T) {
        {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = value.clone();
        }
        self.notify(Arc::new(value));
    }

    /// Mutates the value in place and notifies every subscriber with the result.
    ///
    /// `f` must not read or write this same store; the value is write-locked
    /// while it runs.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let updated = {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut current);
            current.clone()
        };
        self.notify(Arc::new(updated));
    }

    /// Registers `callback`, calls it right away with the current value and
    /// again after every `set`/`update` until the returned handle is
    /// unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<T> = Arc::new(callback);
        lock(&self.inner.subscribers).push((id, Arc::clone(&callback)));

        let current = self.get();
        callback(&current);

        let inner: Arc<dyn Detach> = self.inner.clone();
        Subscription {
            id,
            store: Arc::downgrade(&inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    /// Mirrors the store into a read-only Leptos signal. The backing
    /// subscription is dropped when the current reactive owner is cleaned up.
    pub fn signal(&self) -> ReadSignal<T> {
        let signal = RwSignal::new(self.get());
        let subscription = self.subscribe(move |value: &T| {
            let _ = signal.try_set(value.clone());
        });
        on_cleanup(move || subscription.unsubscribe());
        signal.read_only()
    }

    fn notify(&self, value: Arc<T>) {
        let ids: Vec<u64> = lock(&self.inner.subscribers)
            .iter()
            .map(|(id, _)| *id)
            .collect();
        {
            let mut pending = lock(&self.inner.pending);
            pending
                .queue
                .extend(ids.into_iter().map(|id| (id, Arc::clone(&value))));
            if pending.draining {
                return;
            }
            pending.draining = true;
        }
        self.drain();
    }

    fn drain(&self) {
        let _guard = DrainGuard {
            pending: &self.inner.pending,
        };
        loop {
            let (id, value) = {
                let mut pending = lock(&self.inner.pending);
                match pending.queue.pop_front() {
                    Some(next) => next,
                    None => {
                        pending.draining = false;
                        return;
                    }
                }
            };
            // Looked up per delivery so a subscriber removed mid-drain is skipped.
            let callback = lock(&self.inner.subscribers)
                .iter()
                .find(|(subscriber, _)| *subscriber == id)
                .map(|(_, callback)| Arc::clone(callback));
            if let Some(callback) = callback {
                callback(&value);
            }
        }
    }
}

// Resets the queue if a callback panics, otherwise the store would never drain again.
struct DrainGuard<'a, T> {
    pending: &'a Mutex<Pending<T>>,
}

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut pending = lock(self.pending);
            pending.queue.clear();
            pending.draining = false;
        }
    }
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send + Sync> Detach for Inner<T> {
    fn detach(&self, id: u64) {
        lock(&self.subscribers).retain(|(subscriber, _)| *subscriber != id);
    }
}

/// Handle returned by [`Store::subscribe`]. Dropping it keeps the
/// subscription alive; call [`Subscription::unsubscribe`] to end it.
pub struct Subscription {
    id: u64,
    store: Weak<dyn Detach>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stops further notifications. Calling it twice is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(store) = self.store.upgrade() {
            store.detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

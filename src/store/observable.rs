//! Observable single-value store
//!
//! [`Store`] holds one state value and broadcasts every new value to its
//! listeners. Every `set`/`update` synchronously invokes each listener
//! exactly once, in subscription order, before returning. There is no
//! batching and no equality check: setting an identical value still
//! notifies.
//!
//! A `set` issued from inside a listener is queued and delivered after the
//! current notification round completes, so rounds never interleave. The
//! same queue serialises `set` calls racing on other threads: values are
//! delivered in the order they were written, by whichever caller is already
//! dispatching.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
    dispatch: Mutex<Dispatch<T>>,
}

struct Dispatch<T> {
    running: bool,
    pending: VecDeque<T>,
}

/// Observable container for a single state value.
///
/// Cloning a `Store` yields another handle to the same value and listener
/// set.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use research_sync::store::Store;
///
/// let store = Store::new(1);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let sub = store.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
///
/// store.set(2);
/// store.update(|v| v * 10);
/// sub.unsubscribe();
/// store.set(3);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 20]);
/// assert_eq!(store.get(), 3);
/// ```
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

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self
            .shared
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("value", &*value)
            .field("listeners", &lock(&self.shared.listeners).len())
            .finish()
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a store holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(initial),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                dispatch: Mutex::new(Dispatch {
                    running: false,
                    pending: VecDeque::new(),
                }),
            }),
        }
    }

    /// Register a listener.
    ///
    /// The listener is called once immediately with the current value, then
    /// once for every subsequent `set`/`update` until the returned
    /// [`Subscription`] is unsubscribed. Dropping the subscription handle
    /// does not remove the listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener<T> = Arc::new(listener);
        lock(&self.shared.listeners).push((id, Arc::clone(&listener)));

        let current = self.get();
        listener(&current);

        let shared = Arc::downgrade(&self.shared);
        Subscription {
            remove: Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    lock(&shared.listeners).retain(|(existing, _)| *existing != id);
                }
            }),
        }
    }

    /// Replace the value and notify every listener
    pub fn set(&self, value: T) {
        self.update(|_| value);
    }

    /// Derive the next value from the current one and notify every listener
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let drain = {
            let mut guard = self
                .shared
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = f(guard.clone());
            *guard = next.clone();
            // Queued under the write lock so delivery order matches write order
            self.enqueue(next)
        };
        if drain {
            self.drain();
        }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the current value without cloning it.
    ///
    /// `f` must not call `set`/`update` on this store.
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self
            .shared
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        lock(&self.shared.listeners).len()
    }

    /// Queue `value` for delivery. Returns true if the caller must drain.
    fn enqueue(&self, value: T) -> bool {
        let mut dispatch = lock(&self.shared.dispatch);
        dispatch.pending.push_back(value);
        if dispatch.running {
            return false;
        }
        dispatch.running = true;
        true
    }

    fn drain(&self) {
        let mut reset = DispatchReset {
            dispatch: &self.shared.dispatch,
            armed: true,
        };
        loop {
            let next = {
                let mut dispatch = lock(&self.shared.dispatch);
                match dispatch.pending.pop_front() {
                    Some(next) => next,
                    None => {
                        // Cleared under the same lock an enqueuer checks
                        dispatch.running = false;
                        reset.armed = false;
                        break;
                    }
                }
            };

            let listeners: Vec<Listener<T>> = lock(&self.shared.listeners)
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in &listeners {
                listener(&next);
            }
        }
    }
}

/// Clears the dispatch flag if a listener panics mid-round.
struct DispatchReset<'a, T> {
    dispatch: &'a Mutex<Dispatch<T>>,
    armed: bool,
}

impl<T> Drop for DispatchReset<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let mut dispatch = lock(self.dispatch);
            dispatch.running = false;
            dispatch.pending.clear();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`Store::subscribe`]
pub struct Subscription {
    remove: Box<dyn FnOnce() + Send + Sync>,
}

impl Subscription {
    /// Remove the listener. It will not be called again.
    pub fn unsubscribe(self) {
        (self.remove)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

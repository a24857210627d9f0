//! Read-only projections over a [`Store`]
//!
//! A [`Derived`] view holds no state of its own. Reading it applies the
//! projection to the source's current value, and subscribing to it wraps the
//! listener so the projection runs on every source notification.

use std::fmt;
use std::sync::Arc;

use super::observable::{Store, Subscription};

type Projection<S, T> = Arc<dyn Fn(&S) -> T + Send + Sync>;

/// A value recomputed from a source store on every change.
///
/// # Examples
///
/// ```
/// use research_sync::store::{Derived, Store};
///
/// let source = Store::new(vec![1, 2, 3]);
/// let total = Derived::new(&source, |v: &Vec<i32>| v.iter().sum::<i32>());
/// assert_eq!(total.get(), 6);
///
/// source.set(vec![10]);
/// assert_eq!(total.get(), 10);
/// ```
pub struct Derived<S, T> {
    source: Store<S>,
    project: Projection<S, T>,
}

impl<S, T> Clone for Derived<S, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            project: Arc::clone(&self.project),
        }
    }
}

impl<S, T> fmt::Debug for Derived<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived").finish_non_exhaustive()
    }
}

impl<S, T> Derived<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: 'static,
{
    /// Build a view of `source` through `project`
    pub fn new<F>(source: &Store<S>, project: F) -> Self
    where
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self {
            source: source.clone(),
            project: Arc::new(project),
        }
    }

    /// Current projected value
    pub fn get(&self) -> T {
        self.source.with(|state| (self.project)(state))
    }

    /// Receive the projected value now and after every source change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let project = Arc::clone(&self.project);
        self.source.subscribe(move |state| listener(&project(state)))
    }
}

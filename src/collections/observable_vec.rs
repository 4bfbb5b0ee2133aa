//! A shared, growable vector that notifies subscribers of membership changes.

use core::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use slab::Slab;

/// A membership change of an [`ObservableVec`].
///
/// Indexes refer to the position of the affected item at the time of the
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// An item was inserted at `index`.
    Added {
        /// Position of the new item.
        index: usize,
    },
    /// The item at `index` was removed.
    Removed {
        /// Former position of the item.
        index: usize,
    },
    /// The item at `index` was replaced by another one.
    Replaced {
        /// Position of the replaced item.
        index: usize,
    },
    /// All `len` items were removed at once.
    Cleared {
        /// Number of items removed.
        len: usize,
    },
}

type Handler = Box<dyn Fn(&Change) + Send + Sync>;

struct Inner<T> {
    items: Vec<T>,
    handlers: Slab<Handler>,
}

impl<T> Inner<T> {
    fn notify(&self, change: Change) {
        for (_, handler) in self.handlers.iter() {
            handler(&change);
        }
    }
}

/// A shared, ordered collection whose membership changes can be observed.
///
/// Cloning an `ObservableVec` clones the handle: every clone refers to the same
/// items. All methods take `&self`, so the collection can be mutated from
/// several tasks or threads while a wait is outstanding.
///
/// Every mutation notifies the registered handlers synchronously, before the
/// collection can be read again. Handlers run while the collection is locked
/// and must not call back into it.
///
/// # Examples
///
/// ```
/// use futures_observable::collections::{Change, ObservableVec};
/// use std::sync::{Arc, Mutex};
///
/// let items = ObservableVec::new();
/// let seen = Arc::new(Mutex::new(vec![]));
/// let subscription = items.subscribe({
///     let seen = seen.clone();
///     move |change: &Change| seen.lock().unwrap().push(*change)
/// });
///
/// items.push("a");
/// items.push("b");
/// items.remove(0);
/// drop(subscription);
/// items.push("c");
///
/// assert_eq!(
///     *seen.lock().unwrap(),
///     vec![
///         Change::Added { index: 0 },
///         Change::Added { index: 1 },
///         Change::Removed { index: 0 },
///     ]
/// );
/// assert_eq!(items.snapshot(), vec!["b", "c"]);
/// ```
pub struct ObservableVec<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> ObservableVec<T> {
    /// Create a new, empty collection.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new, empty collection with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(Vec::with_capacity(capacity))
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap()
    }

    /// Returns the number of items in the collection.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns `true` if the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Append an item to the back of the collection.
    pub fn push(&self, item: T) {
        let mut inner = self.lock();
        inner.items.push(item);
        let index = inner.items.len() - 1;
        inner.notify(Change::Added { index });
    }

    /// Insert an item at `index`, shifting all items after it to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&self, index: usize, item: T) {
        let mut inner = self.lock();
        let len = inner.items.len();
        if index > len {
            drop(inner);
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }
        inner.items.insert(index, item);
        inner.notify(Change::Added { index });
    }

    /// Remove and return the item at `index`, shifting all items after it to
    /// the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&self, index: usize) -> T {
        let mut inner = self.lock();
        let len = inner.items.len();
        if index >= len {
            drop(inner);
            panic!("removal index (is {index}) should be < len (is {len})");
        }
        let item = inner.items.remove(index);
        inner.notify(Change::Removed { index });
        item
    }

    /// Replace the item at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace(&self, index: usize, item: T) -> T {
        let mut inner = self.lock();
        let len = inner.items.len();
        if index >= len {
            drop(inner);
            panic!("replacement index (is {index}) should be < len (is {len})");
        }
        let prev = std::mem::replace(&mut inner.items[index], item);
        inner.notify(Change::Replaced { index });
        prev
    }

    /// Remove the last item and return it, or `None` if the collection is
    /// empty.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.lock();
        let item = inner.items.pop()?;
        let index = inner.items.len();
        inner.notify(Change::Removed { index });
        Some(item)
    }

    /// Remove all items. Does not notify if the collection was already empty.
    pub fn clear(&self) {
        let mut inner = self.lock();
        let len = inner.items.len();
        if len == 0 {
            return;
        }
        inner.items.clear();
        inner.notify(Change::Cleared { len });
    }

    /// Register `handler` to be called on every membership change.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription<T>
    where
        F: Fn(&Change) + Send + Sync + 'static,
    {
        let key = self.lock().handlers.insert(Box::new(handler));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            key,
        }
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }
}

impl<T: Clone> ObservableVec<T> {
    /// Copy the current items, in order.
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    /// Returns a copy of the item at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.lock().items.get(index).cloned()
    }
}

impl<T: PartialEq> ObservableVec<T> {
    /// Remove the first item equal to `item`. Returns whether one was found.
    pub fn remove_item(&self, item: &T) -> bool {
        let mut inner = self.lock();
        let Some(index) = inner.items.iter().position(|x| x == item) else {
            return false;
        };
        inner.items.remove(index);
        inner.notify(Change::Removed { index });
        true
    }

    /// Returns `true` if the collection holds an item equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.lock().items.contains(item)
    }
}

impl<T> Clone for ObservableVec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                items,
                handlers: Slab::new(),
            })),
        }
    }
}

impl<T> FromIterator<T> for ObservableVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ObservableVec")
            .field("items", &inner.items)
            .field("subscribers", &inner.handlers.len())
            .finish()
    }
}

/// A registered change handler.
///
/// This `struct` is created by [`ObservableVec::subscribe`]. Dropping it
/// removes the handler. It does not keep the collection alive.
#[must_use = "the handler is removed as soon as the subscription is dropped"]
pub struct Subscription<T> {
    inner: Weak<Mutex<Inner<T>>>,
    key: usize,
}

impl<T> Subscription<T> {
    /// Remove the handler. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().handlers.try_remove(self.key);
        }
    }
}

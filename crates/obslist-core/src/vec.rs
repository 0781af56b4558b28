#![forbid(unsafe_code)]

//! A mutable, array-backed observable list.
//!
//! # Design
//!
//! [`ObservableVec<T>`] is a cheap, cloneable handle over `Rc` shared state.
//! Every mutating method applies the change to storage, releases the
//! storage borrow, and only then fires exactly one [`ListChange`]. Listeners
//! therefore observe the post-mutation length and may read or mutate the
//! list from inside the callback.
//!
//! Mutations that touch an empty range (pushing nothing, clearing an empty
//! list, moving zero elements) fire no event.
//!
//! # Invariants
//!
//! 1. `version()` increments exactly once per structural event.
//! 2. Value-only changes (`set`) never bump the version.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::change::ListChange;
use crate::error::{ListError, Result};
use crate::list::{ListId, ObservableList};
use crate::listener::{ListenerFn, ListenerRegistry, Subscription};

struct VecShared<T> {
    items: RefCell<Vec<T>>,
    listeners: ListenerRegistry,
    /// Bumped on every structural event.
    version: Cell<u64>,
}

/// Observable, growable array. Cloning yields another handle to the same list.
pub struct ObservableVec<T> {
    shared: Rc<VecShared<T>>,
}

impl<T> Clone for ObservableVec<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVec")
            .field("items", &*self.shared.items.borrow())
            .field("version", &self.shared.version.get())
            .field("listeners", &self.shared.listeners.len())
            .finish()
    }
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl<T> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            shared: Rc::new(VecShared {
                items: RefCell::new(items),
                listeners: ListenerRegistry::new(),
                version: Cell::new(0),
            }),
        }
    }
}

impl<T> FromIterator<T> for ObservableVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> ObservableVec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural version; see the module invariants.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.version.get()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }

    #[must_use]
    pub fn id(&self) -> ListId {
        ListId::of(&self.shared)
    }

    /// Read the elements by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this list (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.shared.items.borrow())
    }

    /// Append one element.
    pub fn push(&self, value: T) {
        let start = {
            let mut items = self.shared.items.borrow_mut();
            items.push(value);
            items.len() - 1
        };
        self.commit(ListChange::inserted(start, 1));
    }

    /// Insert one element so that it ends up at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index > len()`.
    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        {
            let mut items = self.shared.items.borrow_mut();
            if index > items.len() {
                return Err(ListError::out_of_range(index, items.len()));
            }
            items.insert(index, value);
        }
        self.commit(ListChange::inserted(index, 1));
        Ok(())
    }

    /// Append every element of `iter` as one insertion.
    pub fn extend(&self, iter: impl IntoIterator<Item = T>) {
        let (start, count) = {
            let mut items = self.shared.items.borrow_mut();
            let start = items.len();
            items.extend(iter);
            (start, items.len() - start)
        };
        if count > 0 {
            self.commit(ListChange::inserted(start, count));
        }
    }

    /// Insert every element of `iter` starting at `index`, as one insertion.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index > len()`.
    pub fn insert_all(&self, index: usize, iter: impl IntoIterator<Item = T>) -> Result<()> {
        let count = {
            let mut items = self.shared.items.borrow_mut();
            if index > items.len() {
                return Err(ListError::out_of_range(index, items.len()));
            }
            let before = items.len();
            items.splice(index..index, iter);
            items.len() - before
        };
        if count > 0 {
            self.commit(ListChange::inserted(index, count));
        }
        Ok(())
    }

    /// Replace the element at `index`, returning the old value.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index >= len()`.
    pub fn set(&self, index: usize, value: T) -> Result<T> {
        let old = {
            let mut items = self.shared.items.borrow_mut();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(ListError::out_of_range(index, len))?;
            std::mem::replace(slot, value)
        };
        self.commit(ListChange::changed(index, 1));
        Ok(old)
    }

    /// Remove and return the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index >= len()`.
    pub fn remove(&self, index: usize) -> Result<T> {
        let value = {
            let mut items = self.shared.items.borrow_mut();
            if index >= items.len() {
                return Err(ListError::out_of_range(index, items.len()));
            }
            items.remove(index)
        };
        self.commit(ListChange::removed(index, 1));
        Ok(value)
    }

    /// Remove a contiguous range as one removal.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when the range is inverted or
    /// extends past the end.
    pub fn remove_range(&self, range: Range<usize>) -> Result<Vec<T>> {
        let removed: Vec<T> = {
            let mut items = self.shared.items.borrow_mut();
            if range.start > range.end {
                return Err(ListError::out_of_range(range.start, range.end));
            }
            if range.end > items.len() {
                return Err(ListError::out_of_range(range.end, items.len()));
            }
            items.drain(range.clone()).collect()
        };
        if !removed.is_empty() {
            self.commit(ListChange::removed(range.start, removed.len()));
        }
        Ok(removed)
    }

    /// Move the block of `count` elements at `from` so that it starts at `to`.
    ///
    /// `to` is expressed in post-move coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when either block would extend
    /// past the end.
    pub fn move_range(&self, from: usize, to: usize, count: usize) -> Result<()> {
        {
            let mut items = self.shared.items.borrow_mut();
            let len = items.len();
            let Some(from_end) = from.checked_add(count).filter(|&end| end <= len) else {
                return Err(ListError::out_of_range(from.saturating_add(count), len));
            };
            if to.checked_add(count).is_none_or(|end| end > len) {
                return Err(ListError::out_of_range(to.saturating_add(count), len));
            }
            if count == 0 || from == to {
                return Ok(());
            }
            let block: Vec<T> = items.drain(from..from_end).collect();
            items.splice(to..to, block);
        }
        self.commit(ListChange::moved(from, to, count));
        Ok(())
    }

    /// Remove every element.
    pub fn clear(&self) {
        let count = {
            let mut items = self.shared.items.borrow_mut();
            let count = items.len();
            items.clear();
            count
        };
        if count > 0 {
            self.commit(ListChange::removed(0, count));
        }
    }

    /// Swap in entirely new contents, announced as a single `Reset`.
    pub fn replace_all(&self, iter: impl IntoIterator<Item = T>) {
        let replacement: Vec<T> = iter.into_iter().collect();
        // Old contents drop after the borrow is released.
        let _old = self.shared.items.replace(replacement);
        self.commit(ListChange::Reset);
    }

    fn commit(&self, change: ListChange) {
        if change.is_structural() {
            self.shared.version.set(self.shared.version.get() + 1);
        }
        tracing::trace!(list = %self.id(), ?change, "observable vec changed");
        self.shared.listeners.notify(&change);
    }
}

impl<T: Clone> ObservableVec<T> {
    /// Clone of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index >= len()`.
    pub fn get(&self, index: usize) -> Result<T> {
        let items = self.shared.items.borrow();
        items
            .get(index)
            .cloned()
            .ok_or(ListError::out_of_range(index, items.len()))
    }

    /// Copy every element out, in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.shared.items.borrow().clone()
    }
}

impl<T: Clone> ObservableList<T> for ObservableVec<T> {
    fn len(&self) -> usize {
        ObservableVec::len(self)
    }

    fn get(&self, index: usize) -> Result<T> {
        ObservableVec::get(self, index)
    }

    fn list_id(&self) -> ListId {
        self.id()
    }

    fn subscribe(&self, listener: Box<ListenerFn>) -> Subscription {
        self.shared.listeners.subscribe_boxed(listener)
    }
}

#![forbid(unsafe_code)]

//! The observable sequence capability.

use std::fmt;
use std::rc::Rc;

use crate::change::ListChange;
use crate::error::Result;
use crate::listener::{ListenerFn, Subscription};

/// Reference identity of a shared list.
///
/// Derived from the address of the list's shared state, so every handle to
/// the same list reports the same id while any handle is alive. Two distinct
/// lists never share an id during their lifetimes, whatever their contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(usize);

impl ListId {
    /// Identity of the allocation behind `shared`.
    #[must_use]
    pub fn of<S: ?Sized>(shared: &Rc<S>) -> Self {
        Self(Rc::as_ptr(shared).cast::<()>() as usize)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{:x}", self.0)
    }
}

/// A sequence that reports every mutation as a [`ListChange`].
///
/// Implementations must fire exactly one event per mutation, after the
/// mutation is applied, with no internal borrow held.
pub trait ObservableList<T> {
    /// Current number of elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`](crate::ListError::IndexOutOfRange)
    /// when `index >= len()`.
    fn get(&self, index: usize) -> Result<T>;

    /// Reference identity of this list.
    fn list_id(&self) -> ListId;

    /// Register a listener for every subsequent change.
    fn subscribe(&self, listener: Box<ListenerFn>) -> Subscription;
}

/// Convenience methods for every [`ObservableList`].
pub trait ObservableListExt<T>: ObservableList<T> {
    /// Subscribe with a closure.
    fn on_change(&self, listener: impl Fn(&ListChange) + 'static) -> Subscription {
        self.subscribe(Box::new(listener))
    }

    /// Copy every element out, in order.
    fn to_vec(&self) -> Vec<T> {
        (0..self.len()).filter_map(|i| self.get(i).ok()).collect()
    }

    /// Whether `other` is the very same list (not merely equal contents).
    fn same_list(&self, other: &dyn ObservableList<T>) -> bool {
        self.list_id() == other.list_id()
    }
}

impl<T, L: ObservableList<T> + ?Sized> ObservableListExt<T> for L {}

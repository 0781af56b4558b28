#![forbid(unsafe_code)]

//! Read-only merge-list view.
//!
//! [`MergeList<T>`] is a cloneable handle onto state owned jointly with its
//! [`MergeSource`](crate::MergeSource). The view never mutates the layout; it
//! only reads through the segment registry and fans out change events.
//!
//! # Invariants
//!
//! 1. `len()` is recomputed from live segment lengths on every call.
//! 2. `version()` increments on every structural change (segment added or
//!    removed, or a forwarded structural event); value-only changes leave it
//!    untouched.
//! 3. Iterators created by [`MergeList::iter`] fail fast once the version
//!    moves.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use obslist_core::{
    ListChange, ListError, ListId, ListenerFn, ListenerRegistry, ObservableList, Result,
    Subscription,
};

use crate::segment::SegmentRegistry;
use crate::translate::{self, Located};

/// State shared by a merge list's view and source handles.
pub(crate) struct MergeShared<T> {
    pub(crate) segments: RefCell<SegmentRegistry<T>>,
    pub(crate) listeners: ListenerRegistry,
    version: Cell<u64>,
}

impl<T> MergeShared<T> {
    pub(crate) fn new() -> Self {
        Self {
            segments: RefCell::new(SegmentRegistry::default()),
            listeners: ListenerRegistry::new(),
            version: Cell::new(0),
        }
    }

    pub(crate) fn bump_version(&self) {
        self.version.set(self.version.get() + 1);
    }

    pub(crate) fn version(&self) -> u64 {
        self.version.get()
    }
}

/// A list presenting several backing lists and standalone items as one.
///
/// Cloning yields another view of the same merge list.
pub struct MergeList<T> {
    pub(crate) shared: Rc<MergeShared<T>>,
}

impl<T> Clone for MergeList<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for MergeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeList")
            .field("segments", &self.segment_count())
            .field("len", &self.len())
            .field("version", &self.version())
            .finish()
    }
}

impl<T> MergeList<T> {
    pub(crate) fn from_shared(shared: Rc<MergeShared<T>>) -> Self {
        Self { shared }
    }

    /// Total number of elements across every segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.segments.borrow().total_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural version counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.version()
    }

    /// Number of registered segments, including empty list segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.shared.segments.borrow().count()
    }

    /// Identities of the backing lists, in layout order.
    #[must_use]
    pub fn backing_lists(&self) -> Vec<ListId> {
        self.shared.segments.borrow().list_segments().collect()
    }

    #[must_use]
    pub fn id(&self) -> ListId {
        ListId::of(&self.shared)
    }

    /// Number of live listeners on this merge list.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }

    /// Register a listener for changes in merge coordinates.
    pub fn on_change(&self, listener: impl Fn(&ListChange) + 'static) -> Subscription {
        self.shared.listeners.subscribe(listener)
    }

    /// Segment and local index for merge index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index >= len()`.
    pub fn locate(&self, index: usize) -> Result<Located> {
        translate::locate(&self.shared.segments.borrow(), index)
    }

    /// Convert a merge index into an index of `backing`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NotOwned`] when `backing` is not a segment of this
    /// list, or [`ListError::IndexOutOfRange`] when `index` falls outside
    /// `backing`'s range.
    pub fn index_in_backing<L>(&self, backing: &L, index: usize) -> Result<usize>
    where
        L: ObservableList<T> + ?Sized,
    {
        translate::to_local(&self.shared.segments.borrow(), backing.list_id(), index)
    }

    /// Convert an index of `backing` into a merge index.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NotOwned`] when `backing` is not a segment of this
    /// list, or [`ListError::IndexOutOfRange`] when `index >= backing.len()`.
    pub fn index_in_composite<L>(&self, backing: &L, index: usize) -> Result<usize>
    where
        L: ObservableList<T> + ?Sized,
    {
        translate::to_composite(&self.shared.segments.borrow(), backing.list_id(), index)
    }
}

impl<T: Clone> MergeList<T> {
    /// Clone of the element at merge index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] when `index >= len()`.
    pub fn get(&self, index: usize) -> Result<T> {
        let segments = self.shared.segments.borrow();
        let located = translate::locate(&segments, index)?;
        match segments.get(located.segment) {
            Some(segment) => segment.get(located.local),
            None => Err(ListError::out_of_range(index, segments.total_len())),
        }
    }

    /// Fail-fast iterator over the current elements.
    #[must_use]
    pub fn iter(&self) -> Iter<T> {
        Iter {
            list: self.clone(),
            next: 0,
            expected: self.version(),
            done: false,
        }
    }

    /// Copy every element out, in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let segments = self.shared.segments.borrow();
        let mut out = Vec::with_capacity(segments.total_len());
        for segment in segments.iter() {
            out.extend((0..segment.len()).filter_map(|local| segment.get(local).ok()));
        }
        out
    }
}

impl<T: Clone> ObservableList<T> for MergeList<T> {
    fn len(&self) -> usize {
        MergeList::len(self)
    }

    fn get(&self, index: usize) -> Result<T> {
        MergeList::get(self, index)
    }

    fn list_id(&self) -> ListId {
        self.id()
    }

    fn subscribe(&self, listener: Box<ListenerFn>) -> Subscription {
        self.shared.listeners.subscribe_boxed(listener)
    }
}

/// Iterator returned by [`MergeList::iter`].
///
/// Yields `Err(ListError::ConcurrentModification)` once, then ends, if the
/// merge list is structurally modified while iterating.
#[derive(Debug)]
pub struct Iter<T> {
    list: MergeList<T>,
    next: usize,
    expected: u64,
    done: bool,
}

impl<T: Clone> Iterator for Iter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let found = self.list.version();
        if found != self.expected {
            self.done = true;
            return Some(Err(ListError::ConcurrentModification {
                expected: self.expected,
                found,
            }));
        }
        if self.next >= self.list.len() {
            self.done = true;
            return None;
        }
        let item = self.list.get(self.next);
        self.next += 1;
        Some(item)
    }
}

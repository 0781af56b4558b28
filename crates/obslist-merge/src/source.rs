#![forbid(unsafe_code)]

//! Mutation facade: the only way to change a merge list's layout.
//!
//! [`MergeSource<T>`] adds and removes whole segments and emits exactly one
//! merge-level event per operation. Every registry borrow is released before
//! listeners run, so a listener may call back into the source or mutate a
//! backing list.

use std::fmt;
use std::rc::Rc;

use obslist_core::{ListChange, ListError, ObservableList, Result};

use crate::list::{MergeList, MergeShared};
use crate::relay;
use crate::segment::Segment;
use crate::translate;

/// Builder and mutation handle for a [`MergeList`].
pub struct MergeSource<T> {
    list: MergeList<T>,
}

impl<T> fmt::Debug for MergeSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeSource").field("list", &self.list).finish()
    }
}

impl<T: Clone + 'static> Default for MergeSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> MergeSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_shared(Rc::new(MergeShared::new()))
    }

    pub(crate) fn from_shared(shared: Rc<MergeShared<T>>) -> Self {
        Self {
            list: MergeList::from_shared(shared),
        }
    }

    /// The read-only view this source mutates.
    #[must_use]
    pub fn list(&self) -> MergeList<T> {
        self.list.clone()
    }

    fn shared(&self) -> &MergeShared<T> {
        &self.list.shared
    }

    /// Append a standalone item.
    pub fn insert_item(&self, value: T) -> &Self {
        let start = {
            let mut segments = self.shared().segments.borrow_mut();
            let start = segments.total_len();
            segments.push(Segment::Item(value));
            start
        };
        self.shared().bump_version();
        tracing::debug!(merge = %self.list.id(), start, "insert_item");
        self.shared().listeners.notify(&ListChange::inserted(start, 1));
        self
    }

    /// Append a backing list. Later changes to `list` are re-emitted here.
    ///
    /// Nothing is emitted when `list` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::SelfMerge`] when `list` is this merge list, and
    /// [`ListError::AlreadyMerged`] when `list` is already a segment.
    pub fn insert_list<L>(&self, list: &L) -> Result<&Self>
    where
        L: ObservableList<T> + Clone + 'static,
    {
        let id = list.list_id();
        if id == self.list.id() {
            return Err(ListError::SelfMerge);
        }
        if self.shared().segments.borrow().position_of_list(id).is_some() {
            return Err(ListError::AlreadyMerged);
        }

        let subscription = list.subscribe(relay::relay_for(
            Rc::downgrade(&self.list.shared),
            id,
        ));
        let count = list.len();
        let start = {
            let mut segments = self.shared().segments.borrow_mut();
            let start = segments.total_len();
            segments.push(Segment::List {
                list: Rc::new(list.clone()),
                id,
                _subscription: subscription,
            });
            start
        };
        self.shared().bump_version();
        tracing::debug!(merge = %self.list.id(), list = %id, start, count, "insert_list");
        if count > 0 {
            self.shared()
                .listeners
                .notify(&ListChange::inserted(start, count));
        }
        Ok(self)
    }

    /// Remove the first standalone item equal to `value`, in layout order.
    ///
    /// Returns `false` when no item matches.
    pub fn remove_item(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let removed = {
            let mut segments = self.shared().segments.borrow_mut();
            segments.position_of_item(value).map(|position| {
                let offset = translate::offset_at(&segments, position);
                (offset, segments.remove(position))
            })
        };
        let Some((offset, _segment)) = removed else {
            return false;
        };
        self.shared().bump_version();
        tracing::debug!(merge = %self.list.id(), offset, "remove_item");
        self.shared()
            .listeners
            .notify(&ListChange::removed(offset, 1));
        true
    }

    /// Remove the backing list `list` (matched by identity) and stop
    /// relaying its changes.
    ///
    /// Returns `false` when `list` is not a segment.
    pub fn remove_list<L>(&self, list: &L) -> bool
    where
        L: ObservableList<T> + ?Sized,
    {
        let id = list.list_id();
        let removed = {
            let mut segments = self.shared().segments.borrow_mut();
            segments.position_of_list(id).map(|position| {
                let offset = translate::offset_at(&segments, position);
                let segment = segments.remove(position);
                (offset, segment.len(), segment)
            })
        };
        let Some((offset, count, segment)) = removed else {
            return false;
        };
        // Unsubscribes the relay.
        drop(segment);
        self.shared().bump_version();
        tracing::debug!(merge = %self.list.id(), list = %id, offset, count, "remove_list");
        if count > 0 {
            self.shared()
                .listeners
                .notify(&ListChange::removed(offset, count));
        }
        true
    }

    /// Remove every segment, emitting a single removal of the whole range.
    pub fn remove_all(&self) {
        let (count, segments) = {
            let mut segments = self.shared().segments.borrow_mut();
            (segments.total_len(), segments.take_all())
        };
        let segment_count = segments.len();
        drop(segments);
        self.shared().bump_version();
        tracing::debug!(merge = %self.list.id(), count, segment_count, "remove_all");
        if count > 0 {
            self.shared()
                .listeners
                .notify(&ListChange::removed(0, count));
        }
    }
}

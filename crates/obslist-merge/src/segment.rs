#![forbid(unsafe_code)]

//! Segment registry: the ordered runs of elements that make up a merge list.
//!
//! The registry is the only record of the merge list's layout. Its logical
//! index space is the concatenation of each segment's index space, in
//! insertion order, with no gaps. Lengths are never cached: list segments
//! grow and shrink on their own, so every length is read live.

use std::rc::Rc;

use obslist_core::{ListId, ObservableList, Result, Subscription};

/// One contiguous run of elements contributed by a single source.
pub(crate) enum Segment<T> {
    /// A standalone value. Always exactly one element long.
    Item(T),
    /// A shared handle to an externally owned observable list.
    List {
        list: Rc<dyn ObservableList<T>>,
        id: ListId,
        /// Keeps the change relay registered; dropped on removal.
        _subscription: Subscription,
    },
}

impl<T> Segment<T> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Item(_) => 1,
            Self::List { list, .. } => list.len(),
        }
    }

    pub(crate) fn list_id(&self) -> Option<ListId> {
        match self {
            Self::Item(_) => None,
            Self::List { id, .. } => Some(*id),
        }
    }

    pub(crate) fn get(&self, local: usize) -> Result<T>
    where
        T: Clone,
    {
        match self {
            Self::Item(value) if local == 0 => Ok(value.clone()),
            Self::Item(_) => Err(obslist_core::ListError::out_of_range(local, 1)),
            Self::List { list, .. } => list.get(local),
        }
    }
}

/// Ordered container of segments. No reordering is exposed.
pub(crate) struct SegmentRegistry<T> {
    segments: Vec<Segment<T>>,
}

impl<T> Default for SegmentRegistry<T> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
        }
    }
}

impl<T> SegmentRegistry<T> {
    pub(crate) fn push(&mut self, segment: Segment<T>) {
        self.segments.push(segment);
    }

    pub(crate) fn remove(&mut self, position: usize) -> Segment<T> {
        self.segments.remove(position)
    }

    /// Empty the registry, handing the segments back so the caller can drop
    /// them (and their subscriptions) outside any borrow.
    pub(crate) fn take_all(&mut self) -> Vec<Segment<T>> {
        std::mem::take(&mut self.segments)
    }

    /// Registry position of the list segment with identity `id`.
    pub(crate) fn position_of_list(&self, id: ListId) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| segment.list_id() == Some(id))
    }

    /// Registry position of the first item segment equal to `value`.
    pub(crate) fn position_of_item(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.segments
            .iter()
            .position(|segment| matches!(segment, Segment::Item(item) if item == value))
    }

    pub(crate) fn get(&self, position: usize) -> Option<&Segment<T>> {
        self.segments.get(position)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Segment<T>> {
        self.segments.iter()
    }

    /// Number of segments (not elements).
    pub(crate) fn count(&self) -> usize {
        self.segments.len()
    }

    /// Sum of every segment's current length.
    pub(crate) fn total_len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub(crate) fn list_segments(&self) -> impl Iterator<Item = ListId> + '_ {
        self.segments.iter().filter_map(Segment::list_id)
    }
}

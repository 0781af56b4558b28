#![forbid(unsafe_code)]

//! Change events emitted by observable lists.
//!
//! Every event describes one contiguous range in the coordinates of the list
//! that emitted it. Events are emitted after the mutation has been applied,
//! so the sender's length already reflects the change.

/// A single mutation of an observable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListChange {
    /// `count` elements starting at `start` were replaced in place.
    Changed { start: usize, count: usize },
    /// `count` elements were inserted so that the first now sits at `start`.
    Inserted { start: usize, count: usize },
    /// `count` elements that started at `start` were removed.
    Removed { start: usize, count: usize },
    /// A block of `count` elements moved from `from` so that it now starts at `to`.
    Moved { from: usize, to: usize, count: usize },
    /// The contents changed in a way not expressible as a single range.
    Reset,
}

impl ListChange {
    #[must_use]
    pub const fn changed(start: usize, count: usize) -> Self {
        Self::Changed { start, count }
    }

    #[must_use]
    pub const fn inserted(start: usize, count: usize) -> Self {
        Self::Inserted { start, count }
    }

    #[must_use]
    pub const fn removed(start: usize, count: usize) -> Self {
        Self::Removed { start, count }
    }

    #[must_use]
    pub const fn moved(from: usize, to: usize, count: usize) -> Self {
        Self::Moved { from, to, count }
    }

    /// Whether the event invalidates index meaning (everything but `Changed`).
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Changed { .. })
    }

    /// Number of elements covered by the event. `Reset` covers none.
    #[must_use]
    pub const fn count(&self) -> usize {
        match *self {
            Self::Changed { count, .. }
            | Self::Inserted { count, .. }
            | Self::Removed { count, .. }
            | Self::Moved { count, .. } => count,
            Self::Reset => 0,
        }
    }

    /// Signed effect of the event on the sender's length.
    ///
    /// `Reset` reports zero; the caller must re-read the length.
    #[must_use]
    pub fn len_delta(&self) -> isize {
        match *self {
            Self::Inserted { count, .. } => isize::try_from(count).unwrap_or(isize::MAX),
            Self::Removed { count, .. } => -isize::try_from(count).unwrap_or(isize::MAX),
            Self::Changed { .. } | Self::Moved { .. } | Self::Reset => 0,
        }
    }

    /// The same event with every position moved `offset` places to the right.
    ///
    /// A move shifts both endpoints by the same offset.
    #[must_use]
    pub const fn shifted(self, offset: usize) -> Self {
        match self {
            Self::Changed { start, count } => Self::Changed {
                start: start + offset,
                count,
            },
            Self::Inserted { start, count } => Self::Inserted {
                start: start + offset,
                count,
            },
            Self::Removed { start, count } => Self::Removed {
                start: start + offset,
                count,
            },
            Self::Moved { from, to, count } => Self::Moved {
                from: from + offset,
                to: to + offset,
                count,
            },
            Self::Reset => Self::Reset,
        }
    }
}

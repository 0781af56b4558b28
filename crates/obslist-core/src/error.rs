#![forbid(unsafe_code)]

//! Error taxonomy shared by every observable list.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ListError>;

/// Errors raised by reads, coordinate conversions, and segment registration.
///
/// "Not found" on removal is not an error: `remove_item` and `remove_list`
/// report it as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("list is not a segment of this merge list")]
    NotOwned,

    #[error("list is already a segment of this merge list")]
    AlreadyMerged,

    #[error("a merge list cannot contain itself")]
    SelfMerge,

    #[error("list was structurally modified during iteration (version {expected} -> {found})")]
    ConcurrentModification { expected: u64, found: u64 },

    #[error("internal invariant violated: {0}")]
    InternalInvariant(&'static str),
}

impl ListError {
    #[must_use]
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Whether this error is a range violation.
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}

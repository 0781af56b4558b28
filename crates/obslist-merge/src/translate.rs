#![forbid(unsafe_code)]

//! Index translation between merge-list coordinates and segment coordinates.
//!
//! Every function here is a linear scan over segments, accumulating live
//! segment lengths. Cost is proportional to the number of segments, never to
//! the number of elements.

use obslist_core::{ListError, ListId, Result};

use crate::segment::{Segment, SegmentRegistry};

/// Where a merge-list index lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    /// Registry position of the segment.
    pub segment: usize,
    /// Index within that segment.
    pub local: usize,
    /// Identity of the backing list, or `None` for a standalone item.
    pub list: Option<ListId>,
}

/// Find the segment holding merge index `index`.
pub(crate) fn locate<T>(segments: &SegmentRegistry<T>, index: usize) -> Result<Located> {
    let mut offset = 0;
    for (position, segment) in segments.iter().enumerate() {
        let len = segment.len();
        if index - offset < len {
            return Ok(Located {
                segment: position,
                local: index - offset,
                list: segment.list_id(),
            });
        }
        offset += len;
    }
    Err(ListError::out_of_range(index, offset))
}

/// Sum of the lengths of every segment before `position`.
pub(crate) fn offset_at<T>(segments: &SegmentRegistry<T>, position: usize) -> usize {
    segments.iter().take(position).map(Segment::len).sum()
}

/// Registry position and merge offset of the list segment `id`.
pub(crate) fn offset_of<T>(segments: &SegmentRegistry<T>, id: ListId) -> Result<(usize, usize)> {
    let mut offset = 0;
    for (position, segment) in segments.iter().enumerate() {
        if segment.list_id() == Some(id) {
            return Ok((position, offset));
        }
        offset += segment.len();
    }
    Err(ListError::NotOwned)
}

/// Merge index `index` expressed as an index into list segment `id`.
pub(crate) fn to_local<T>(segments: &SegmentRegistry<T>, id: ListId, index: usize) -> Result<usize> {
    let (position, offset) = offset_of(segments, id)?;
    let len = segments.get(position).map_or(0, Segment::len);
    match index.checked_sub(offset) {
        Some(local) if local < len => Ok(local),
        _ => Err(ListError::out_of_range(index, offset + len)),
    }
}

/// Index `local` of list segment `id` expressed as a merge index.
pub(crate) fn to_composite<T>(
    segments: &SegmentRegistry<T>,
    id: ListId,
    local: usize,
) -> Result<usize> {
    let (position, offset) = offset_of(segments, id)?;
    let len = segments.get(position).map_or(0, Segment::len);
    if local < len {
        Ok(offset + local)
    } else {
        Err(ListError::out_of_range(local, len))
    }
}

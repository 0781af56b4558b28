#![forbid(unsafe_code)]

//! Change relay: re-emits backing-list events in merge coordinates.
//!
//! One relay callback is registered per list segment for as long as the
//! segment is registered. The callback holds only a `Weak` reference to the
//! merge state, so a merge list dropped while its backing lists live on
//! leaves inert callbacks behind rather than a reference cycle.
//!
//! The offset for an event is the sum of the lengths of the segments that
//! precede the sender. The sender's own length (which already reflects the
//! event) never contributes, so the same offset is correct for inserts,
//! removes, and both endpoints of a move.

use std::rc::Weak;

use obslist_core::{ListChange, ListError, ListId, ListenerFn};

use crate::list::MergeShared;
use crate::translate;

/// Build the relay callback for the list segment `id`.
pub(crate) fn relay_for<T: 'static>(shared: Weak<MergeShared<T>>, id: ListId) -> Box<ListenerFn> {
    Box::new(move |change: &ListChange| {
        if let Some(shared) = shared.upgrade() {
            forward(&shared, id, *change);
        }
    })
}

/// Translate `change` from segment `id` and deliver it to merge listeners.
///
/// # Panics
///
/// Panics if `id` is not a registered segment. Segments are unsubscribed
/// before they leave the registry, so this indicates a lifecycle bug.
pub(crate) fn forward<T>(shared: &MergeShared<T>, id: ListId, change: ListChange) {
    let located = translate::offset_of(&shared.segments.borrow(), id);
    let (segment, offset) = match located {
        Ok(found) => found,
        Err(_) => {
            let err = ListError::InternalInvariant("change relayed for an unregistered segment");
            tracing::error!(list = %id, ?change, "{err}");
            panic!("{err}");
        }
    };

    let translated = change.shifted(offset);
    if change.is_structural() {
        shared.bump_version();
    }
    tracing::trace!(
        list = %id,
        segment,
        offset,
        ?change,
        ?translated,
        version = shared.version(),
        "relayed backing change"
    );
    shared.listeners.notify(&translated);
}

#![forbid(unsafe_code)]

//! Merge list: several observable lists and standalone items presented as one
//! contiguous observable list.
//!
//! - [`MergeSource`]: the mutation facade. Inserts and removes whole
//!   segments (standalone items or backing lists).
//! - [`MergeList`]: the read-only view. Reads walk the segment registry;
//!   changes to any backing list are re-emitted in merge coordinates.
//!
//! # Architecture
//!
//! Both handles share one `Rc` state holding the ordered segment registry,
//! the merge list's listeners, and a structural version counter. Each
//! backing list carries one relay subscription, held by its segment, that
//! translates segment-local events by the segment's current offset.
//!
//! Everything is single-threaded and synchronous: a backing-list mutation
//! reaches merge listeners before the mutating call returns, and listeners
//! may re-enter either handle or any backing list.
//!
//! # Example
//!
//! ```
//! use obslist_core::ObservableVec;
//! use obslist_merge::MergeSource;
//!
//! let source = MergeSource::new();
//! let merged = source.list();
//! let tail = ObservableVec::from(vec!["b"]);
//!
//! source.insert_item("a");
//! source.insert_list(&tail).unwrap();
//! tail.push("c");
//!
//! assert_eq!(merged.to_vec(), vec!["a", "b", "c"]);
//! ```

mod list;
mod relay;
mod segment;
mod source;
mod translate;

pub use list::{Iter, MergeList};
pub use source::MergeSource;
pub use translate::Located;

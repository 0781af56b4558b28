#![forbid(unsafe_code)]

//! obslist public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub mod prelude {
    pub use obslist_core as core;
    pub use obslist_merge as merge;

    pub use obslist_core::{
        ListChange, ListError, ListId, ObservableList, ObservableListExt, ObservableVec,
        Subscription,
    };
    pub use obslist_merge::{MergeList, MergeSource};
}

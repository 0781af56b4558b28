#![forbid(unsafe_code)]

//! Core: the observable list capability, change events, and listener registry.
//!
//! - [`ListChange`]: contiguous-range mutation events (changed, inserted,
//!   removed, moved) plus a whole-list [`ListChange::Reset`].
//! - [`ListenerRegistry`] / [`Subscription`]: per-instance listener fan-out
//!   with RAII unsubscription.
//! - [`ObservableList`]: the capability any observable sequence exposes.
//! - [`ObservableVec`]: a mutable, array-backed observable sequence.
//!
//! # Architecture
//!
//! Lists are single-threaded handles over `Rc` shared state. Listeners are
//! stored as `Weak` callbacks and invoked synchronously, in registration
//! order, after the mutation that triggered them has been applied and every
//! internal borrow has been released. Listeners may therefore re-enter the
//! list that is notifying them.

pub mod change;
pub mod error;
pub mod list;
pub mod listener;
pub mod vec;

pub use change::ListChange;
pub use error::{ListError, Result};
pub use list::{ListId, ObservableList, ObservableListExt};
pub use listener::{ListenerFn, ListenerRegistry, Subscription};
pub use vec::ObservableVec;

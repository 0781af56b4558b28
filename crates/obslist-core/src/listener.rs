#![forbid(unsafe_code)]

//! Per-instance listener registry with RAII subscriptions.
//!
//! # Design
//!
//! The registry stores `Weak` references to listener callbacks; the strong
//! reference lives in the [`Subscription`] handed back to the subscriber.
//! Dropping the subscription is therefore all it takes to unsubscribe, and
//! dead entries are pruned lazily on the next subscribe or notify.
//!
//! # Invariants
//!
//! 1. Listeners are invoked in registration order.
//! 2. No internal borrow is held while a listener runs, so a listener may
//!    subscribe, unsubscribe, or trigger a nested notification.
//! 3. A listener whose subscription is dropped during a notification cycle
//!    is not invoked for the remainder of that cycle.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::change::ListChange;

/// Callback signature for list listeners.
pub type ListenerFn = dyn Fn(&ListChange);

/// Ordered set of listeners attached to one list instance.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RefCell<Vec<Weak<ListenerFn>>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("live", &self.len())
            .finish()
    }
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered while the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn(&ListChange) + 'static) -> Subscription {
        self.subscribe_boxed(Box::new(callback))
    }

    /// Register an already boxed listener.
    pub fn subscribe_boxed(&self, callback: Box<ListenerFn>) -> Subscription {
        let strong: Rc<ListenerFn> = Rc::from(callback);
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|weak| weak.strong_count() > 0);
        listeners.push(Rc::downgrade(&strong));
        Subscription {
            callback: Some(strong),
        }
    }

    /// Deliver `change` to every live listener, in registration order.
    pub fn notify(&self, change: &ListChange) {
        let snapshot = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.clone()
        };
        for weak in snapshot {
            // Upgrade at call time: an earlier listener may have dropped this one.
            if let Some(callback) = weak.upgrade() {
                callback(change);
            }
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII guard for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    callback: Option<Rc<ListenerFn>>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        self.callback = None;
    }

    /// Whether the guard still holds its listener.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#![forbid(unsafe_code)]

//! Output event channels.
//!
//! An [`EventEmitter<T>`] is the output half of an input/output binding pair:
//! a view emits values and whoever listens decides what to do with them.
//! Delivery has the same timing as [`Observable::set`](super::Observable::set):
//! synchronous, in subscription order, finished before `emit()` returns.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::observable::{Subscribers, Subscription, deliver};

/// Synchronous event channel carrying values of type `T`.
///
/// Clones share the listener list.
pub struct EventEmitter<T> {
    listeners: Rc<RefCell<Subscribers<T>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: 'static> EventEmitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Subscribers::new())),
        }
    }

    /// Deliver `value` to every live listener. A no-op without listeners.
    pub fn emit(&self, value: T) {
        let snapshot = self.listeners.borrow_mut().snapshot();

        #[cfg(feature = "tracing")]
        tracing::trace!(listeners = snapshot.len(), "event emitted");

        deliver(&snapshot, &value);
    }

    /// Listen for emitted values until the returned subscription is released.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        self.listeners.borrow_mut().add(listener)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().live()
    }

    /// A handle that does not keep the emitter alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakEventEmitter<T> {
        WeakEventEmitter {
            listeners: Rc::downgrade(&self.listeners),
        }
    }
}

/// Non-owning handle to an [`EventEmitter`].
///
/// Lets an owner notice that every clone of the emitter has been dropped.
pub struct WeakEventEmitter<T> {
    listeners: Weak<RefCell<Subscribers<T>>>,
}

impl<T> Clone for WeakEventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Weak::clone(&self.listeners),
        }
    }
}

impl<T> fmt::Debug for WeakEventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventEmitter")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<T> WeakEventEmitter<T> {
    /// Whether some clone of the emitter still exists.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.listeners.strong_count() > 0
    }

    #[must_use]
    pub fn upgrade(&self) -> Option<EventEmitter<T>> {
        self.listeners
            .upgrade()
            .map(|listeners| EventEmitter { listeners })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_without_listeners_is_noop() {
        let emitter = EventEmitter::new();
        emitter.emit(1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn listeners_receive_in_order() {
        let emitter = EventEmitter::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _a = emitter.subscribe(move |v: &u8| l1.borrow_mut().push((1, *v)));
        let l2 = Rc::clone(&log);
        let _b = emitter.subscribe(move |v: &u8| l2.borrow_mut().push((2, *v)));

        emitter.emit(9);
        assert_eq!(*log.borrow(), vec![(1, 9), (2, 9)]);
    }

    #[test]
    fn released_listener_stops_receiving() {
        let emitter = EventEmitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut sub = emitter.subscribe(move |_: &()| h.set(h.get() + 1));

        emitter.emit(());
        sub.release();
        sub.release();
        emitter.emit(());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clone_shares_listeners() {
        let emitter = EventEmitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = emitter.subscribe(move |_: &i32| h.set(h.get() + 1));

        emitter.clone().emit(4);
        assert_eq!(hits.get(), 1);
        assert_eq!(format!("{emitter:?}"), "EventEmitter { listeners: 1 }");
    }

    #[test]
    fn weak_handle_tracks_all_clones() {
        let emitter = EventEmitter::<u8>::new();
        let second = emitter.clone();
        let weak = emitter.downgrade();
        assert!(weak.is_alive());

        drop(emitter);
        assert!(weak.is_alive());
        assert!(weak.upgrade().is_some());

        drop(second);
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
    }
}

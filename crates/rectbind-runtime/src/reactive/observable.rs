#![forbid(unsafe_code)]

//! Shared, version-tracked values with synchronous change notification.
//!
//! An [`Observable<T>`] is a cheaply cloneable handle to one shared value.
//! Every clone reads and writes the same slot, so an owner can hand a clone
//! to a view and see every replacement the view makes.
//!
//! # Invariants
//!
//! 1. `set()` always replaces the value, bumps the version, and notifies.
//!    Setting a value equal to the current one is *not* skipped.
//! 2. Subscribers are notified in registration order, and all of them have
//!    run before `set()` returns.
//! 3. No internal borrow is held while a subscriber runs, so a subscriber may
//!    read the observable or call `set()` again. A nested `set()` notifies
//!    everyone with the newer value and ends the outer pass, so the last value
//!    each subscriber sees is the value the cell holds.
//! 4. A [`Subscription`] that is released (explicitly or by drop) is never
//!    invoked afterwards, even later in a notification cycle already running.
//! 5. Releasing a subscription more than once is a no-op.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

// ---------------------------------------------------------------------------
// Subscriber list
// ---------------------------------------------------------------------------

/// Ordered list of weakly held callbacks.
///
/// The strong side of each callback lives in the [`Subscription`] returned to
/// the caller; the list only keeps `Weak` pointers and prunes dead ones when
/// it is next touched.
pub(crate) struct Subscribers<T> {
    entries: Vec<Weak<Callback<T>>>,
}

impl<T: 'static> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.entries.retain(|w| w.strong_count() > 0);
        self.entries.push(Rc::downgrade(&strong));
        Subscription::from_guard(Box::new(strong))
    }

    /// Drop dead entries and return the live ones, in registration order.
    pub(crate) fn snapshot(&mut self) -> Vec<Weak<Callback<T>>> {
        self.entries.retain(|w| w.strong_count() > 0);
        self.entries.clone()
    }

    pub(crate) fn live(&self) -> usize {
        self.entries.iter().filter(|w| w.strong_count() > 0).count()
    }
}

/// Deliver `value` to each callback in `snapshot`.
///
/// Each entry is upgraded right before it runs, which is what keeps a
/// subscription released mid-cycle from firing.
pub(crate) fn deliver<T>(snapshot: &[Weak<Callback<T>>], value: &T) {
    deliver_while(snapshot, value, || true);
}

/// Like [`deliver`], but stops as soon as `current()` turns false.
pub(crate) fn deliver_while<T>(
    snapshot: &[Weak<Callback<T>>],
    value: &T,
    current: impl Fn() -> bool,
) {
    for weak in snapshot {
        if !current() {
            break;
        }
        if let Some(callback) = weak.upgrade() {
            callback(value);
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle for one registered callback.
///
/// Delivery stops when the handle is released with [`release`](Self::release)
/// or dropped, whichever comes first.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    fn from_guard(guard: Box<dyn Any>) -> Self {
        Self { guard: Some(guard) }
    }

    /// Stop delivery. Calling this again is a no-op.
    pub fn release(&mut self) {
        self.guard = None;
    }

    /// Whether this subscription still receives notifications.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Observable<T>
// ---------------------------------------------------------------------------

struct Inner<T> {
    value: T,
    version: u64,
    subscribers: Subscribers<T>,
}

/// A shared value with change notification.
///
/// Cloning an `Observable` clones the handle, not the value.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create an observable holding `value`, at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                subscribers: Subscribers::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not call `set()` on this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify every live subscriber.
    ///
    /// If a subscriber calls `set()` again, the nested call notifies every
    /// subscriber with its value and the remaining subscribers of this pass
    /// are skipped.
    pub fn set(&self, value: T) {
        let (current, version, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            let snapshot = inner.subscribers.snapshot();
            (inner.value.clone(), inner.version, snapshot)
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(version, subscribers = snapshot.len(), "observable set");

        let inner = &self.inner;
        deliver_while(&snapshot, &current, || inner.borrow().version == version);
    }

    /// Register `callback` to run after every `set()`.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.borrow_mut().subscribers.add(callback)
    }

    /// Number of `set()` calls since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of subscriptions that are still active.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.live()
    }

    /// Whether `self` and `other` are handles to the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_returns_initial_value() {
        let obs = Observable::new(7);
        assert_eq!(obs.get(), 7);
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn set_replaces_and_bumps_version() {
        let obs = Observable::new(String::from("a"));
        obs.set("b".into());
        assert_eq!(obs.get(), "b");
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn equal_value_still_notifies() {
        let obs = Observable::new(1);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        obs.set(1);
        obs.set(1);
        assert_eq!(hits.get(), 2);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = obs.subscribe(move |v| l1.borrow_mut().push(("first", *v)));
        let l2 = Rc::clone(&log);
        let _b = obs.subscribe(move |v| l2.borrow_mut().push(("second", *v)));

        obs.set(5);
        assert_eq!(*log.borrow(), vec![("first", 5), ("second", 5)]);
    }

    #[test]
    fn dropped_subscription_is_not_called() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = obs.subscribe(move |_| h.set(h.get() + 1));
        drop(sub);

        obs.set(3);
        assert_eq!(hits.get(), 0);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let obs = Observable::new(0);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut sub = obs.subscribe(move |_| h.set(h.get() + 1));

        obs.set(1);
        sub.release();
        sub.release();
        assert!(!sub.is_active());

        obs.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscriber_may_read_and_set_reentrantly() {
        let obs = Observable::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner = obs.clone();
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| {
            s.borrow_mut().push(inner.get());
            if *v == 1 {
                inner.set(2);
            }
        });

        obs.set(1);
        assert_eq!(obs.get(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn nested_set_leaves_later_subscribers_current() {
        let obs = Observable::new(String::from("50x50"));
        let later = Rc::new(RefCell::new(Vec::new()));

        let inner = obs.clone();
        let _first = obs.subscribe(move |v: &String| {
            if v == "200x100" {
                inner.set("10x10".into());
            }
        });
        let l = Rc::clone(&later);
        let _second = obs.subscribe(move |v: &String| l.borrow_mut().push(v.clone()));

        obs.set("200x100".into());
        assert_eq!(obs.get(), "10x10");
        assert_eq!(*later.borrow(), vec!["10x10"]);
        assert_eq!(later.borrow().last().map(String::as_str), Some("10x10"));
    }

    #[test]
    fn release_during_notify_skips_later_subscriber() {
        let obs = Observable::new(0);
        let late_hits = Rc::new(Cell::new(0));
        let late_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&late_slot);
        let _early = obs.subscribe(move |_| {
            if let Some(sub) = slot.borrow_mut().as_mut() {
                sub.release();
            }
        });
        let h = Rc::clone(&late_hits);
        *late_slot.borrow_mut() = Some(obs.subscribe(move |_| h.set(h.get() + 1)));

        obs.set(1);
        assert_eq!(late_hits.get(), 0);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(1);
        let b = a.clone();
        b.set(9);
        assert_eq!(a.get(), 9);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Observable::new(9)));
    }

    #[test]
    fn with_borrows_without_clone() {
        let obs = Observable::new(vec![1, 2, 3]);
        assert_eq!(obs.with(|v| v.len()), 3);
    }

    #[test]
    fn debug_shows_value_and_version() {
        let obs = Observable::new(4);
        obs.set(5);
        let debug = format!("{obs:?}");
        assert!(debug.contains("value: 5"));
        assert!(debug.contains("version: 1"));
    }
}

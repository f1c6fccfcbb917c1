#![forbid(unsafe_code)]

//! One-way read bindings and subscription scopes.
//!
//! A [`Binding<T>`] is the input half of an input/output pair: a read-only
//! view of an [`Observable`], optionally mapped. The [`bind!`] and
//! [`bind_map!`] macros are shorthand for the free functions.
//!
//! ```
//! use rectbind_runtime::reactive::{Observable, bind_mapped};
//!
//! let width = Observable::new(String::from("50"));
//! let label = bind_mapped(&width, |w| format!("{w}px"));
//! assert_eq!(label.get(), "50px");
//!
//! width.set("80".into());
//! assert_eq!(label.get(), "80px");
//! ```
//!
//! # Invariants
//!
//! 1. `Binding::get()` always returns the current (not stale) value.
//! 2. A binding's transform runs on every `get()`; nothing is cached.
//! 3. Clones of a binding read the same source.
//! 4. Dropping a [`BindingScope`] releases every subscription it holds.

use std::fmt;
use std::rc::Rc;

use super::model::Model;
use super::observable::{Observable, Subscription};

// ---------------------------------------------------------------------------
// Binding<T>
// ---------------------------------------------------------------------------

/// A read-only, lazily evaluated binding.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Create a binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Current bound value.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Apply a further transform, returning a new `Binding`.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// A binding that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone())
    }
}

/// Bind directly to an observable.
pub fn bind_observable<T: Clone + 'static>(source: &Observable<T>) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.get())
}

/// Bind to an observable through `map`.
pub fn bind_mapped<S: Clone + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.with(|v| map(v)))
}

/// Read-only binding over a model's cell.
pub fn bind_model<T: Clone + 'static>(model: &Model<T>) -> Binding<T> {
    bind_observable(model.observable())
}

/// Create a direct [`Binding`] to an observable.
#[macro_export]
macro_rules! bind {
    ($obs:expr) => {
        $crate::reactive::binding::bind_observable(&$obs)
    };
}

/// Create a mapped [`Binding`] from an observable and a transform.
#[macro_export]
macro_rules! bind_map {
    ($obs:expr, $f:expr) => {
        $crate::reactive::binding::bind_mapped(&$obs, $f)
    };
}

// ---------------------------------------------------------------------------
// BindingScope
// ---------------------------------------------------------------------------

/// Holds the subscriptions that belong to one logical owner.
///
/// Dropping the scope, or calling [`clear`](Self::clear), releases all of
/// them. The scope is reusable after `clear()`. Entries added with
/// [`hold_while`](Self::hold_while) are released by [`prune`](Self::prune)
/// once their liveness check fails.
#[derive(Default)]
pub struct BindingScope {
    entries: Vec<Held>,
}

struct Held {
    _sub: Subscription,
    alive: Option<Box<dyn Fn() -> bool>>,
}

impl Held {
    fn is_alive(&self) -> bool {
        self.alive.as_ref().is_none_or(|alive| alive())
    }
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive for as long as the scope.
    pub fn hold(&mut self, sub: Subscription) {
        self.entries.push(Held {
            _sub: sub,
            alive: None,
        });
    }

    /// Keep `sub` alive while `alive()` returns true.
    pub fn hold_while(&mut self, sub: Subscription, alive: impl Fn() -> bool + 'static) {
        self.entries.push(Held {
            _sub: sub,
            alive: Some(Box::new(alive)),
        });
    }

    /// Subscribe to `source` for the lifetime of the scope.
    pub fn subscribe<T: Clone + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.hold(sub);
        self
    }

    /// Release entries whose liveness check fails. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(Held::is_alive);
        before - self.entries.len()
    }

    /// Number of held subscriptions that are still live.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.entries.iter().filter(|held| held.is_alive()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binding_count() == 0
    }

    /// Release every held subscription now.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.binding_count())
            .finish()
    }
}

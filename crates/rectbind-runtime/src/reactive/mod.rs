#![forbid(unsafe_code)]

//! Reactive bindings for rectbind.
//!
//! - [`Observable`]: a shared, version-tracked value with synchronous change
//!   notification.
//! - [`Subscription`]: handle that stops delivery on release or drop.
//! - [`Model`]: a required two-way binding over an `Observable`.
//! - [`EventEmitter`]: an output channel for the input/output binding style.
//! - [`Binding`]: a read-only, optionally mapped view of an `Observable`.
//! - [`BindingScope`]: owner of a group of subscriptions.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily.
//! None of these types are `Send`; they belong to one UI thread.
//!
//! # Invariants
//!
//! 1. Every `set()` bumps the version and notifies, even for an equal value.
//! 2. Subscribers are notified in registration order, before `set()` returns.
//! 3. A released [`Subscription`] is never invoked again; release is
//!    idempotent.

pub mod binding;
pub mod emitter;
pub mod model;
pub mod observable;

pub use binding::{Binding, BindingScope, bind_mapped, bind_model, bind_observable};
pub use emitter::{EventEmitter, WeakEventEmitter};
pub use model::{MissingValueError, Model, require};
pub use observable::{Observable, Subscription};

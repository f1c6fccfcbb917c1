#![forbid(unsafe_code)]

//! Single-threaded reactive primitives for two-way bound views.

pub mod reactive;

pub use reactive::{
    Binding, BindingScope, EventEmitter, MissingValueError, Model, Observable, Subscription,
};

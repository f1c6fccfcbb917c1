#![forbid(unsafe_code)]

//! Required two-way model bindings.
//!
//! A [`Model<T>`] is the slot a view exposes for two-way binding: the owning
//! context supplies the value when the view is attached, the view reads it and
//! may replace it wholesale, and the owner observes every replacement
//! synchronously.
//!
//! A model is always required. There is no empty state, so a missing initial
//! value is reported as a [`MissingValueError`] at construction rather than
//! being filled with a default.
//!
//! ```
//! use rectbind_runtime::reactive::{Model, Observable};
//!
//! let owner = Observable::new(String::from("left"));
//! let model = Model::bind(&owner);
//!
//! model.set("right".to_string());
//! assert_eq!(owner.get(), "right");
//! ```

use std::fmt;

use super::observable::{Observable, Subscription};

/// A required binding was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingValueError {
    /// Name of the binding that was left empty.
    pub binding: &'static str,
}

impl MissingValueError {
    #[must_use]
    pub const fn new(binding: &'static str) -> Self {
        Self { binding }
    }
}

impl fmt::Display for MissingValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required binding '{}' was not provided", self.binding)
    }
}

impl std::error::Error for MissingValueError {}

/// Unwrap a required binding, reporting `binding` by name when it is absent.
pub fn require<T>(binding: &'static str, value: Option<T>) -> Result<T, MissingValueError> {
    match value {
        Some(value) => Ok(value),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(binding, "required binding missing");
            Err(MissingValueError::new(binding))
        }
    }
}

/// A required, two-way bound value.
///
/// Clones share the same underlying [`Observable`]. There are no field-level
/// setters: the value is only ever replaced as a whole.
pub struct Model<T> {
    cell: Observable<T>,
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Model").field(&self.cell).finish()
    }
}

impl<T: Clone + 'static> Model<T> {
    /// Create a model owning a fresh cell seeded with `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            cell: Observable::new(initial),
        }
    }

    /// Create a model from a value that may be absent.
    ///
    /// # Errors
    ///
    /// [`MissingValueError`] naming `binding` when `initial` is `None`.
    pub fn required(binding: &'static str, initial: Option<T>) -> Result<Self, MissingValueError> {
        require(binding, initial).map(Self::new)
    }

    /// Bind to a cell owned elsewhere. Writes through the model are visible
    /// to every other handle of `cell`.
    #[must_use]
    pub fn bind(cell: &Observable<T>) -> Self {
        Self { cell: cell.clone() }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not call `set()` on this model or any handle sharing its
    /// cell; the cell is borrowed while `f` runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    /// Replace the value and notify observers before returning.
    pub fn set(&self, next: T) {
        self.cell.set(next);
    }

    /// Observe every subsequent `set()`.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        self.cell.subscribe(listener)
    }

    /// Number of replacements since the cell was created.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.cell.subscriber_count()
    }

    /// The cell this model reads and writes.
    #[must_use]
    pub fn observable(&self) -> &Observable<T> {
        &self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn required_without_value_fails() {
        let err = Model::<u32>::required("size", None).unwrap_err();
        assert_eq!(err, MissingValueError::new("size"));
        assert_eq!(err.to_string(), "required binding 'size' was not provided");
    }

    #[test]
    fn required_with_value_succeeds() {
        let model = Model::required("size", Some(3)).unwrap();
        assert_eq!(model.get(), 3);
    }

    #[test]
    fn bind_shares_owner_cell() {
        let owner = Observable::new(1);
        let model = Model::bind(&owner);
        model.set(2);
        assert_eq!(owner.get(), 2);

        owner.set(3);
        assert_eq!(model.get(), 3);
        assert!(model.observable().ptr_eq(&owner));
    }

    #[test]
    fn owner_sees_write_before_set_returns() {
        let owner = Observable::new(0);
        let model = Model::bind(&owner);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sub = owner.subscribe(move |v| s.set(*v));

        model.set(11);
        assert_eq!(seen.get(), 11);
    }

    #[test]
    fn model_subscribers_are_ordered() {
        let model = Model::new('a');
        let log = Rc::new(RefCell::new(String::new()));
        let l1 = Rc::clone(&log);
        let _one = model.subscribe(move |_| l1.borrow_mut().push('1'));
        let l2 = Rc::clone(&log);
        let _two = model.subscribe(move |_| l2.borrow_mut().push('2'));

        model.set('b');
        model.set('b');
        assert_eq!(*log.borrow(), "1212");
        assert_eq!(model.version(), 2);
        assert_eq!(model.subscriber_count(), 2);
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn set_inside_with_panics() {
        let model = Model::new(1);
        let writer = model.clone();
        model.with(|_| writer.set(2));
    }

    #[test]
    fn error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&MissingValueError::new("x"));
    }
}

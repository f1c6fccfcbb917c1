#![forbid(unsafe_code)]

//! Rectangle view with a two-way bound size.
//!
//! The view is attached to a [`Dimension`] supplied by its owner and offers a
//! single user action, reset, which replaces the whole dimension with
//! `200 x 100`.
//!
//! Two attachment styles are provided and are observably identical from the
//! owner's side:
//!
//! - [`RectView`] takes a [`Model<Dimension>`] and writes the reset value into
//!   it directly.
//! - [`RectEmitterView`] takes a read-only [`Binding<Dimension>`] input and
//!   reports the reset value on its `size_change` output. The owner is
//!   expected to listen and write the value back.
//!
//! # Invariants
//!
//! 1. A view cannot exist without its size binding; attaching without one
//!    fails with [`MissingValueError`].
//! 2. Width and height are always replaced together.
//! 3. `on_reset()` always produces `200 x 100`, whatever the prior value.

use std::fmt;

use rectbind_runtime::reactive::{Binding, EventEmitter, MissingValueError, Model, require};

/// Width written by [`reset`].
pub const RESET_WIDTH: &str = "200";
/// Height written by [`reset`].
pub const RESET_HEIGHT: &str = "100";

/// Name under which the size binding is reported in errors.
pub const SIZE_BINDING: &str = "size";

/// Rectangle dimensions, kept as text exactly as supplied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    width: String,
    height: String,
}

impl Dimension {
    #[must_use]
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    /// The value every reset produces.
    #[must_use]
    pub fn reset_value() -> Self {
        Self::new(RESET_WIDTH, RESET_HEIGHT)
    }

    #[must_use]
    pub fn width(&self) -> &str {
        &self.width
    }

    #[must_use]
    pub fn height(&self) -> &str {
        &self.height
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Replace `size` with `200 x 100`, notifying its observers.
pub fn reset(size: &Model<Dimension>) {
    size.set(Dimension::reset_value());
}

// ---------------------------------------------------------------------------
// RectView: model binding
// ---------------------------------------------------------------------------

/// Rectangle view bound to its owner through a [`Model`].
#[derive(Clone, Debug)]
pub struct RectView {
    size: Model<Dimension>,
}

impl RectView {
    /// Attach to `size`.
    ///
    /// # Errors
    ///
    /// [`MissingValueError`] for the `size` binding when `size` is `None`.
    pub fn attach(size: Option<Model<Dimension>>) -> Result<Self, MissingValueError> {
        require(SIZE_BINDING, size).map(Self::from_model)
    }

    /// Attach to a model that is known to be present.
    #[must_use]
    pub fn from_model(size: Model<Dimension>) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(size = %size.get(), "rect view attached");

        Self { size }
    }

    /// Current size.
    #[must_use]
    pub fn size(&self) -> Dimension {
        self.size.get()
    }

    /// The bound model.
    #[must_use]
    pub fn model(&self) -> &Model<Dimension> {
        &self.size
    }

    /// User action: reset the bound size.
    pub fn on_reset(&self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("rect_reset", strategy = "model").entered();

        reset(&self.size);
    }
}

// ---------------------------------------------------------------------------
// RectEmitterView: input + output binding
// ---------------------------------------------------------------------------

/// Rectangle view with a read-only size input and a `size_change` output.
#[derive(Clone)]
pub struct RectEmitterView {
    size: Binding<Dimension>,
    size_change: EventEmitter<Dimension>,
}

impl RectEmitterView {
    /// Attach to the `size` input.
    ///
    /// # Errors
    ///
    /// [`MissingValueError`] for the `size` binding when `size` is `None`.
    pub fn attach(size: Option<Binding<Dimension>>) -> Result<Self, MissingValueError> {
        require(SIZE_BINDING, size).map(Self::from_input)
    }

    /// Attach to an input that is known to be present.
    #[must_use]
    pub fn from_input(size: Binding<Dimension>) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(size = %size.get(), "rect emitter view attached");

        Self {
            size,
            size_change: EventEmitter::new(),
        }
    }

    /// Current value of the input.
    #[must_use]
    pub fn size(&self) -> Dimension {
        self.size.get()
    }

    /// Output channel carrying requested size changes.
    #[must_use]
    pub fn size_change(&self) -> &EventEmitter<Dimension> {
        &self.size_change
    }

    /// User action: request a reset. The input itself is left untouched.
    pub fn on_reset(&self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("rect_reset", strategy = "emitter").entered();

        self.size_change.emit(Dimension::reset_value());
    }
}

impl fmt::Debug for RectEmitterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RectEmitterView")
            .field("size", &self.size())
            .field("size_change", &self.size_change)
            .finish()
    }
}

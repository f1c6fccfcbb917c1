#![forbid(unsafe_code)]

//! Owning context for rectangle views.
//!
//! A [`RectHost`] owns the authoritative size cell. Views attached through
//! it share that cell, so the host sees every reset as soon as the view's
//! action returns.
//!
//! ```
//! use rectbind_widgets::host::RectHost;
//! use rectbind_widgets::rect::Dimension;
//!
//! let host = RectHost::new(Dimension::new("50", "50"));
//! let view = host.attach_view();
//! view.on_reset();
//! assert_eq!(host.size(), Dimension::new("200", "100"));
//! assert_eq!(host.label().get(), "200 x 100");
//! ```

use std::fmt;

use rectbind_runtime::reactive::{
    Binding, BindingScope, MissingValueError, Model, Observable, Subscription, bind_mapped,
    bind_observable, require,
};

use crate::rect::{Dimension, RectEmitterView, RectView, SIZE_BINDING};

/// Parent of one or more rectangle views.
pub struct RectHost {
    size: Observable<Dimension>,
    scope: BindingScope,
}

impl RectHost {
    /// Create a host holding `initial`.
    #[must_use]
    pub fn new(initial: Dimension) -> Self {
        Self {
            size: Observable::new(initial),
            scope: BindingScope::new(),
        }
    }

    /// Create a host from a size that may be absent.
    ///
    /// # Errors
    ///
    /// [`MissingValueError`] for the `size` binding when `initial` is `None`.
    pub fn try_new(initial: Option<Dimension>) -> Result<Self, MissingValueError> {
        require(SIZE_BINDING, initial).map(Self::new)
    }

    /// Current size.
    #[must_use]
    pub fn size(&self) -> Dimension {
        self.size.get()
    }

    /// Replace the size from the owner's side.
    pub fn set_size(&self, next: Dimension) {
        self.size.set(next);
    }

    /// Number of replacements so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.size.version()
    }

    /// Observe every replacement, whichever side made it.
    pub fn observe(&self, listener: impl Fn(&Dimension) + 'static) -> Subscription {
        self.size.subscribe(listener)
    }

    /// Display text for the current size, e.g. `"200 x 100"`.
    #[must_use]
    pub fn label(&self) -> Binding<String> {
        bind_mapped(&self.size, |d| format!("{} x {}", d.width(), d.height()))
    }

    /// Attach a model-bound view to the host's cell.
    #[must_use]
    pub fn attach_view(&self) -> RectView {
        RectView::from_model(Model::bind(&self.size))
    }

    /// Attach an input/output view and route its `size_change` output back
    /// into the host's cell.
    ///
    /// The route lives until every clone of the view is dropped or
    /// [`detach_all`](Self::detach_all) is called. Routes of dropped views
    /// are released on the next attach.
    pub fn attach_emitter_view(&mut self) -> RectEmitterView {
        self.scope.prune();

        let view = RectEmitterView::from_input(bind_observable(&self.size));
        let cell = self.size.clone();
        let route = view
            .size_change()
            .subscribe(move |next| cell.set(next.clone()));
        let emitter = view.size_change().downgrade();
        self.scope.hold_while(route, move || emitter.is_alive());
        view
    }

    /// Release every output route installed by
    /// [`attach_emitter_view`](Self::attach_emitter_view).
    pub fn detach_all(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(routes = self.scope.binding_count(), "detaching emitter views");

        self.scope.clear();
    }

    /// Number of live emitter views currently routed into the host.
    #[must_use]
    pub fn routed_views(&self) -> usize {
        self.scope.binding_count()
    }
}

impl fmt::Debug for RectHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RectHost")
            .field("size", &self.size())
            .field("version", &self.version())
            .field("routed_views", &self.routed_views())
            .finish()
    }
}

#![forbid(unsafe_code)]

//! Rectangle views with a two-way bound size, and the host that owns it.

pub mod host;
pub mod rect;

pub use host::RectHost;
pub use rect::{Dimension, RectEmitterView, RectView, reset};

//! The owning map context

pub mod context;

pub use context::{MapContext, MapView};

//! Grid Compositor Module
//!
//! Builds one composite image showing every cluster side by side:
//! - Layout geometry and the memory budget check
//! - Cell assignment and pixel copying
//! - Hand-off to an external sink for display or storage

pub mod compositor;
pub mod layout;
pub mod sink;

pub use compositor::{compose, Composite, BACKGROUND};
pub use layout::{
    placements, CellPlacement, ComposeOptions, LayoutGeometry, DEFAULT_MEMORY_LIMIT_BYTES,
};
pub use sink::{visualize, CompositeSink, PngSink};

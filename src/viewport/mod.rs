//! Viewport virtualization: geometry inputs and the index-window engine.

pub mod geometry;
pub mod virtualizer;

pub use geometry::{GeometryProbe, SurfaceRect};
pub use virtualizer::{MountHandler, VisibleRange, Virtualizer};

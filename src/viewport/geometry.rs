//! Scroll-surface geometry inputs.
//!
//! The engine is unit-agnostic: "pixels" are abstract vertical units. The TUI
//! host uses 1 unit = 1 terminal row; a GUI host would pass real pixels.

/// Bounding rect of a virtualized surface, relative to the viewport origin.
///
/// `top` is negative once the surface has scrolled above the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Top edge relative to the viewport top.
    pub top: f64,
    /// Surface height.
    pub height: f64,
}

impl SurfaceRect {
    /// Rect from top and height.
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Geometry collaborator queried on every scroll notification.
///
/// Scroll notifications carry no payload; the virtualizer reads current
/// geometry through this trait instead.
pub trait GeometryProbe {
    /// Current surface rect, or `None` while the surface is not yet
    /// attached/measurable. Unmeasurable geometry yields an empty visible
    /// range, not an error.
    fn surface_rect(&self) -> Option<SurfaceRect>;

    /// Current viewport height.
    fn viewport_height(&self) -> f64;
}

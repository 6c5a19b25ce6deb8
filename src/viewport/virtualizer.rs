//! Viewport virtualizer: maps scroll geometry to mounted line indices.

use super::geometry::GeometryProbe;
use tracing::trace;

/// Half-open `[start, end)` interval over line indices, clamped to
/// `[0, list_size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// First index whose item intersects the extended viewport.
    pub start: usize,
    /// One past the last such index.
    pub end: usize,
}

impl VisibleRange {
    /// Range from bounds. An inverted pair collapses to empty.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when no index is visible.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `index` falls inside the range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Iterate the contained indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..self.end
    }
}

/// Mount/unmount collaborator.
///
/// Returning `false` from [`mount`](MountHandler::mount) means "data not
/// ready": the index stays unmounted and is retried on the next pass. These
/// callbacks are expected to be total; anything they panic with propagates to
/// the caller of `mount_visible`/`on_scroll`, since swallowing it would
/// corrupt the mounted-index bookkeeping.
pub trait MountHandler {
    /// Materialize the item at `index`. `false` defers to a later pass.
    fn mount(&mut self, index: usize) -> bool;

    /// Detach the item at `index`. `false` keeps the index flagged mounted.
    fn unmount(&mut self, index: usize) -> bool;
}

/// Decides which indices of one fixed-item-height surface must be
/// materialized, touching only indices that transition on scroll.
#[derive(Debug)]
pub struct Virtualizer {
    item_height: f64,
    margin: f64,
    list_size: usize,
    mounted: Vec<bool>,
    visible: VisibleRange,
}

impl Virtualizer {
    /// Build a virtualizer and compute the initial visible range.
    ///
    /// `margin` is the fixed lookahead applied above and below the viewport.
    pub fn new(
        item_height: f64,
        margin: f64,
        list_size: usize,
        geometry: &impl GeometryProbe,
    ) -> Self {
        let mut virtualizer = Self {
            item_height,
            margin,
            list_size: 0,
            mounted: Vec::new(),
            visible: VisibleRange::default(),
        };
        virtualizer.set_size(list_size, geometry);
        virtualizer
    }

    /// Set the logical list size and recompute the stored visible range.
    ///
    /// Mounted flags for surviving indices are preserved (the list size grows
    /// on every loader batch; wiping flags would remount the whole window
    /// each time). Does not mount or unmount; callers request materialization
    /// explicitly afterward.
    pub fn set_size(&mut self, list_size: usize, geometry: &impl GeometryProbe) {
        self.list_size = list_size;
        self.mounted.resize(list_size, false);
        self.visible = self.calc_visible_range(geometry);
    }

    /// Clear all mounted flags and recompute the visible range.
    ///
    /// Used when the surface's contents were externally discarded (a pager
    /// recycling a page), so the bookkeeping matches the now-empty surface.
    pub fn reset(&mut self, geometry: &impl GeometryProbe) {
        self.mounted.iter_mut().for_each(|flag| *flag = false);
        self.visible = self.calc_visible_range(geometry);
    }

    /// Mount every unmounted index in the current visible range.
    ///
    /// Indices whose mount callback returns `false` stay unmounted and are
    /// retried on the next call; no index is skipped permanently.
    pub fn mount_visible(&mut self, handler: &mut impl MountHandler) {
        for index in self.visible.indices() {
            if !self.mounted[index] && handler.mount(index) {
                self.mounted[index] = true;
            }
        }
    }

    /// Recompute the visible range from current geometry and reconcile.
    ///
    /// Only transitioning indices are touched, keeping the cost proportional
    /// to the scroll delta rather than the list size. Flags change only on a
    /// `true` callback return.
    pub fn on_scroll(&mut self, geometry: &impl GeometryProbe, handler: &mut impl MountHandler) {
        let next = self.calc_visible_range(geometry);
        trace!(
            old_start = self.visible.start,
            old_end = self.visible.end,
            new_start = next.start,
            new_end = next.end,
            "Visible range recomputed"
        );

        for index in self.visible.indices() {
            if next.contains(index) {
                continue;
            }
            if self.mounted[index] && handler.unmount(index) {
                self.mounted[index] = false;
            }
        }

        for index in next.indices() {
            if !self.mounted[index] && handler.mount(index) {
                self.mounted[index] = true;
            }
        }

        self.visible = next;
    }

    /// Unmount every currently mounted index, regardless of visibility.
    ///
    /// Used before a surface's window is relabeled, so detach callbacks fire
    /// while the old index mapping is still in effect.
    pub fn unmount_all(&mut self, handler: &mut impl MountHandler) {
        for index in 0..self.list_size {
            if self.mounted[index] && handler.unmount(index) {
                self.mounted[index] = false;
            }
        }
    }

    /// The stored visible range.
    pub fn visible_range(&self) -> VisibleRange {
        self.visible
    }

    /// Whether `index` is currently flagged mounted.
    pub fn is_mounted(&self, index: usize) -> bool {
        self.mounted.get(index).copied().unwrap_or(false)
    }

    /// Current logical list size.
    pub fn list_size(&self) -> usize {
        self.list_size
    }

    /// Index range whose items intersect the viewport extended by the
    /// lookahead margin:
    ///
    /// ```text
    /// start = floor(max(0, -top - margin) / item_height)
    /// end   = max(0, floor((-top + viewport_height + margin) / item_height) - 1)
    /// ```
    ///
    /// both clamped to `[0, list_size]`. An unmeasurable surface yields an
    /// empty range.
    fn calc_visible_range(&self, geometry: &impl GeometryProbe) -> VisibleRange {
        let Some(rect) = geometry.surface_rect() else {
            return VisibleRange::default();
        };

        let top_px = (-rect.top - self.margin).max(0.0);
        let bottom_px = -rect.top + geometry.viewport_height() + self.margin;

        let start = ((top_px / self.item_height).floor() as usize).min(self.list_size);
        let end_index = (bottom_px / self.item_height).floor() as isize - 1;
        let end = (end_index.max(0) as usize).min(self.list_size);

        VisibleRange::new(start, end)
    }
}

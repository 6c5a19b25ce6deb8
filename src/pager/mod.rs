//! Double-buffered pagination over two virtualized page surfaces.
//!
//! Exactly two [`Page`]s ever exist. Each is a contiguous window
//! `[offset, offset + capacity)` over the global line index space, backed by
//! its own [`Virtualizer`] scoped to local indices `0..capacity`. Two edge
//! sentinels watch the composed container; when one becomes visible the page
//! at the opposite edge is recycled past the other — its offset relabeled,
//! its container re-placed, and the scroll position compensated by exactly
//! one page height so the visual position is unchanged. Live node count stays
//! O(capacity) no matter how long the document is.
//!
//! Swaps are atomic with respect to scroll handling: both sentinels are
//! detached before any page mutation and reattached only after the new
//! layout and scroll compensation are applied.

use crate::viewport::geometry::{GeometryProbe, SurfaceRect};
use crate::viewport::{MountHandler, Virtualizer};
use tracing::debug;

/// Stable identity of one of the two page containers.
///
/// Identity is threaded through every host callback explicitly, so a single
/// host implementation serves both pages without per-page closure capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    /// First page container.
    A,
    /// Second page container.
    B,
}

/// Edge of the composed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Logical start of the list.
    Top,
    /// Logical end of the list.
    Bottom,
}

/// Host collaborator for the pager: rendering surface, geometry, and scroll
/// control. Callbacks are expected to be total functions.
pub trait PagerHost {
    /// Materialize global line `global` into `page` at local slot `local`.
    /// `false` means the line is not loaded yet; it will be retried.
    fn mount(&mut self, page: PageId, global: usize, local: usize) -> bool;

    /// Detach global line `global` from `page`. `false` keeps it mounted.
    fn unmount(&mut self, page: PageId, global: usize, local: usize) -> bool;

    /// Current bounding rect of a page surface, or `None` if unmeasurable.
    fn page_rect(&self, page: PageId) -> Option<SurfaceRect>;

    /// Current viewport height.
    fn viewport_height(&self) -> f64;

    /// Discard a page's materialized content and re-place its (now empty)
    /// container at the given edge of the composed list.
    fn place_page(&mut self, page: PageId, edge: Edge);

    /// A page's logical height changed; the host should resize the
    /// container to `lines` items.
    fn page_resized(&mut self, page: PageId, lines: usize);

    /// Adjust the scroll position by `delta` units (positive scrolls down),
    /// compensating a recycle so the visual position is unchanged.
    fn scroll_by(&mut self, delta: f64);
}

/// Point-in-time geometry of one page surface, captured before handing a
/// mutable host borrow to the virtualizer.
#[derive(Debug, Clone, Copy)]
struct GeometrySnapshot {
    rect: Option<SurfaceRect>,
    viewport_height: f64,
}

impl GeometrySnapshot {
    fn capture(host: &impl PagerHost, page: PageId) -> Self {
        Self {
            rect: host.page_rect(page),
            viewport_height: host.viewport_height(),
        }
    }
}

impl GeometryProbe for GeometrySnapshot {
    fn surface_rect(&self) -> Option<SurfaceRect> {
        self.rect
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

/// Adapts a [`PagerHost`] to one page's [`MountHandler`], translating the
/// page-local indices the virtualizer works in to global line indices.
struct PageMounter<'host, H> {
    host: &'host mut H,
    page: PageId,
    offset: usize,
}

impl<H: PagerHost> MountHandler for PageMounter<'_, H> {
    fn mount(&mut self, local: usize) -> bool {
        self.host.mount(self.page, self.offset + local, local)
    }

    fn unmount(&mut self, local: usize) -> bool {
        self.host.unmount(self.page, self.offset + local, local)
    }
}

/// One bounded page window backed by its own virtualizer.
#[derive(Debug)]
pub struct Page {
    id: PageId,
    /// Global index of local slot 0. Rewritten in place on recycle.
    offset: usize,
    /// Lines currently shown; `capacity` except for a partial last page.
    size: usize,
    virtualizer: Virtualizer,
}

impl Page {
    fn new(
        id: PageId,
        item_height: f64,
        margin: f64,
        size: usize,
        offset: usize,
        geometry: &impl GeometryProbe,
    ) -> Self {
        Self {
            id,
            offset,
            size,
            virtualizer: Virtualizer::new(item_height, margin, size, geometry),
        }
    }

    /// This page's container identity.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Global index of the page's first line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Lines currently shown by this page.
    pub fn size(&self) -> usize {
        self.size
    }

    fn set_size(&mut self, lines: usize, host: &mut impl PagerHost) {
        if self.size != lines {
            self.size = lines;
            let snapshot = GeometrySnapshot::capture(&*host, self.id);
            self.virtualizer.set_size(lines, &snapshot);
            host.page_resized(self.id, lines);
        }
    }

    fn mount_visible(&mut self, host: &mut impl PagerHost) {
        let snapshot = GeometrySnapshot::capture(&*host, self.id);
        self.virtualizer.set_size(self.size, &snapshot);
        let mut mounter = PageMounter {
            host,
            page: self.id,
            offset: self.offset,
        };
        self.virtualizer.mount_visible(&mut mounter);
    }

    fn on_scroll(&mut self, host: &mut impl PagerHost) {
        let snapshot = GeometrySnapshot::capture(&*host, self.id);
        let mut mounter = PageMounter {
            host,
            page: self.id,
            offset: self.offset,
        };
        self.virtualizer.on_scroll(&snapshot, &mut mounter);
    }

    /// Detach everything currently mounted. Must run while the offset still
    /// reflects the lines actually on the surface, before any relabeling.
    fn clear(&mut self, host: &mut impl PagerHost) {
        let mut mounter = PageMounter {
            host,
            page: self.id,
            offset: self.offset,
        };
        self.virtualizer.unmount_all(&mut mounter);
    }

    /// Re-place the (cleared) container at `edge` and re-materialize.
    fn remount(&mut self, edge: Edge, host: &mut impl PagerHost) {
        host.place_page(self.id, edge);
        let snapshot = GeometrySnapshot::capture(&*host, self.id);
        self.virtualizer.reset(&snapshot);
        self.mount_visible(host);
    }
}

/// Zero-size edge marker reporting intersection transitions.
///
/// Only a transition into visibility while attached produces a trigger;
/// notifications during a swap (sentinels detached) are dropped, which is
/// what makes the swap atomic.
#[derive(Debug)]
struct Sentinel {
    attached: bool,
    intersecting: bool,
}

impl Sentinel {
    fn new() -> Self {
        Self {
            attached: true,
            intersecting: false,
        }
    }

    fn observe(&mut self, intersecting: bool) -> bool {
        let triggered = self.attached && intersecting && !self.intersecting;
        if self.attached {
            self.intersecting = intersecting;
        }
        triggered
    }

    // Keeps the last reported state so a report repeated after reattach is
    // not mistaken for a fresh transition.
    fn detach(&mut self) {
        self.attached = false;
    }

    fn attach(&mut self) {
        self.attached = true;
    }
}

/// Two-page recycling state machine presenting one continuous list.
#[derive(Debug)]
pub struct DoublePager {
    item_height: f64,
    capacity: usize,
    /// `pages[0]` is the leading (lower-offset) page, `pages[1]` trailing.
    pages: [Page; 2],
    top_sentinel: Sentinel,
    bottom_sentinel: Sentinel,
    /// Unknown until the loader first reports; grows monotonically after.
    total_lines: Option<usize>,
    sentinel_margin_base: f64,
}

impl DoublePager {
    /// Build the pager: page A at offset 0 (leading), page B at offset
    /// `capacity` (trailing), both placed at the container end in order,
    /// sentinels attached.
    pub fn new(
        item_height: f64,
        lookahead_margin: f64,
        capacity: usize,
        host: &mut impl PagerHost,
    ) -> Self {
        fn make_page<H: PagerHost>(
            host: &mut H,
            id: PageId,
            item_height: f64,
            margin: f64,
            capacity: usize,
            offset: usize,
        ) -> Page {
            let snapshot = GeometrySnapshot::capture(&*host, id);
            let page = Page::new(id, item_height, margin, capacity, offset, &snapshot);
            host.page_resized(id, capacity);
            page
        }
        let page_a = make_page(host, PageId::A, item_height, lookahead_margin, capacity, 0);
        let page_b = make_page(
            host,
            PageId::B,
            item_height,
            lookahead_margin,
            capacity,
            capacity,
        );

        // Recycling should begin slightly before the boundary is reached so
        // the swap latency stays hidden.
        let sentinel_margin_base = (100.0_f64).min(0.1 * capacity as f64) * item_height;

        let mut pager = Self {
            item_height,
            capacity,
            pages: [page_a, page_b],
            top_sentinel: Sentinel::new(),
            bottom_sentinel: Sentinel::new(),
            total_lines: None,
            sentinel_margin_base,
        };
        pager.pages[0].remount(Edge::Bottom, host);
        pager.pages[1].remount(Edge::Bottom, host);
        pager
    }

    /// The leading (lower-offset) page.
    pub fn leading(&self) -> &Page {
        &self.pages[0]
    }

    /// The trailing (higher-offset) page.
    pub fn trailing(&self) -> &Page {
        &self.pages[1]
    }

    /// Lines per full page.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Margin at which an edge sentinel should be considered intersecting.
    /// The top edge uses twice the base so upward recycling starts earlier.
    pub fn sentinel_margin(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.sentinel_margin_base * 2.0,
            Edge::Bottom => self.sentinel_margin_base,
        }
    }

    /// Mount every visible unmounted line on both pages. Retries lines the
    /// host reported not ready on earlier passes.
    pub fn mount_visible(&mut self, host: &mut impl PagerHost) {
        for page in &mut self.pages {
            page.mount_visible(host);
        }
    }

    /// Scroll notification: reconcile both pages against current geometry.
    pub fn on_scroll(&mut self, host: &mut impl PagerHost) {
        for page in &mut self.pages {
            page.on_scroll(host);
        }
    }

    /// The loader reported a new (monotonically grown, or final) total.
    pub fn set_total_lines(&mut self, total: usize, host: &mut impl PagerHost) {
        self.total_lines = Some(total);
        self.fit_pages(host);
    }

    /// Edge sentinel intersection report from the host.
    ///
    /// Triggers at most one recycle per visibility transition; reports while
    /// the sentinels are detached mid-swap are dropped.
    pub fn on_sentinel(&mut self, edge: Edge, intersecting: bool, host: &mut impl PagerHost) {
        match edge {
            Edge::Top => {
                if self.top_sentinel.observe(intersecting) && self.pages[0].offset != 0 {
                    self.recycle_up(host);
                }
            }
            Edge::Bottom => {
                let below_total = self
                    .total_lines
                    .is_none_or(|total| self.pages[1].offset + self.capacity < total);
                if self.bottom_sentinel.observe(intersecting) && below_total {
                    self.recycle_down(host);
                }
            }
        }
    }

    /// Recycle the trailing page above the leading one (scrolling toward
    /// the start).
    fn recycle_up(&mut self, host: &mut impl PagerHost) {
        self.top_sentinel.detach();
        self.bottom_sentinel.detach();

        self.pages.swap(0, 1);
        self.pages[0].clear(host);
        self.pages[0].offset = self.pages[1].offset - self.capacity;
        self.fit_pages(host);

        // Compensate before remounting so the recycled page mounts against
        // settled geometry.
        host.scroll_by(self.capacity as f64 * self.item_height);
        self.pages[0].remount(Edge::Top, host);

        debug!(
            leading_offset = self.pages[0].offset,
            trailing_offset = self.pages[1].offset,
            "Recycled page upward"
        );
        self.top_sentinel.attach();
        self.bottom_sentinel.attach();
    }

    /// Recycle the leading page below the trailing one (scrolling toward
    /// the end).
    fn recycle_down(&mut self, host: &mut impl PagerHost) {
        self.top_sentinel.detach();
        self.bottom_sentinel.detach();

        self.pages.swap(0, 1);
        self.pages[1].clear(host);
        self.pages[1].offset = self.pages[0].offset + self.capacity;
        self.fit_pages(host);

        host.scroll_by(-(self.capacity as f64) * self.item_height);
        self.pages[1].remount(Edge::Bottom, host);

        debug!(
            leading_offset = self.pages[0].offset,
            trailing_offset = self.pages[1].offset,
            "Recycled page downward"
        );
        self.top_sentinel.attach();
        self.bottom_sentinel.attach();
    }

    /// Clamp both page sizes against the current total: a short document
    /// lives entirely in the leading page; the trailing page shrinks to the
    /// remainder when its window extends past the end.
    fn fit_pages(&mut self, host: &mut impl PagerHost) {
        let Some(total) = self.total_lines else {
            let capacity = self.capacity;
            self.pages[0].set_size(capacity, host);
            self.pages[1].set_size(capacity, host);
            return;
        };

        if total < self.capacity {
            self.pages[0].set_size(total, host);
            self.pages[1].set_size(0, host);
        } else {
            let capacity = self.capacity;
            self.pages[0].set_size(capacity, host);
            let trailing_offset = self.pages[1].offset;
            if trailing_offset > total - capacity {
                self.pages[1].set_size(total - trailing_offset.min(total), host);
            } else {
                self.pages[1].set_size(capacity, host);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Mount/unmount call record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Call {
        page: PageId,
        global: usize,
        local: usize,
    }

    /// Host double modeling a scrollable container the way a DOM/TUI host
    /// would: page containers stacked in placement order, heights from
    /// `page_resized`, rects derived from the scroll position.
    struct TestHost {
        item_height: f64,
        viewport_height: f64,
        scroll: f64,
        /// Container order, top to bottom.
        order: Vec<PageId>,
        heights: BTreeMap<&'static str, f64>,
        loaded_lines: usize,
        mounts: Vec<Call>,
        unmounts: Vec<Call>,
        placements: Vec<(PageId, Edge)>,
    }

    impl TestHost {
        fn new(item_height: f64, viewport_height: f64, loaded_lines: usize) -> Self {
            Self {
                item_height,
                viewport_height,
                scroll: 0.0,
                order: Vec::new(),
                heights: BTreeMap::new(),
                loaded_lines,
                mounts: Vec::new(),
                unmounts: Vec::new(),
                placements: Vec::new(),
            }
        }

        fn key(page: PageId) -> &'static str {
            match page {
                PageId::A => "a",
                PageId::B => "b",
            }
        }

        fn clear_calls(&mut self) {
            self.mounts.clear();
            self.unmounts.clear();
            self.placements.clear();
        }
    }

    impl PagerHost for TestHost {
        fn mount(&mut self, page: PageId, global: usize, local: usize) -> bool {
            if global >= self.loaded_lines {
                return false;
            }
            self.mounts.push(Call {
                page,
                global,
                local,
            });
            true
        }

        fn unmount(&mut self, page: PageId, global: usize, local: usize) -> bool {
            self.unmounts.push(Call {
                page,
                global,
                local,
            });
            true
        }

        fn page_rect(&self, page: PageId) -> Option<SurfaceRect> {
            let mut top = -self.scroll;
            for placed in &self.order {
                let height = self.heights.get(Self::key(*placed)).copied().unwrap_or(0.0);
                if *placed == page {
                    return Some(SurfaceRect::new(top, height));
                }
                top += height;
            }
            None
        }

        fn viewport_height(&self) -> f64 {
            self.viewport_height
        }

        fn place_page(&mut self, page: PageId, edge: Edge) {
            self.order.retain(|placed| *placed != page);
            match edge {
                Edge::Top => self.order.insert(0, page),
                Edge::Bottom => self.order.push(page),
            }
            self.placements.push((page, edge));
        }

        fn page_resized(&mut self, page: PageId, lines: usize) {
            self.heights
                .insert(Self::key(page), lines as f64 * self.item_height);
        }

        fn scroll_by(&mut self, delta: f64) {
            self.scroll += delta;
        }
    }

    /// 1-unit rows, 10-row viewport, capacity 100.
    fn pager_with_host(loaded: usize) -> (DoublePager, TestHost) {
        let mut host = TestHost::new(1.0, 10.0, loaded);
        let pager = DoublePager::new(1.0, 0.0, 100, &mut host);
        (pager, host)
    }

    mod construction {
        use super::*;

        #[test]
        fn initial_pages_sit_at_offset_zero_and_capacity() {
            let (pager, _host) = pager_with_host(1000);
            assert_eq!(pager.leading().offset(), 0);
            assert_eq!(pager.trailing().offset(), 100);
            assert_eq!(pager.leading().id(), PageId::A);
            assert_eq!(pager.trailing().id(), PageId::B);
        }

        #[test]
        fn both_pages_are_placed_in_order() {
            let (_pager, host) = pager_with_host(1000);
            assert_eq!(host.order, vec![PageId::A, PageId::B]);
        }

        #[test]
        fn construction_mounts_the_initially_visible_lines() {
            let (_pager, host) = pager_with_host(1000);
            // Viewport of 10 rows at scroll 0: page A local range [0, 9).
            let globals: Vec<usize> = host.mounts.iter().map(|call| call.global).collect();
            assert_eq!(globals, (0..9).collect::<Vec<_>>());
        }

        #[test]
        fn sentinel_margins_derive_from_capacity_and_item_height() {
            let (pager, _host) = pager_with_host(1000);
            // base = min(100, 10% of 100) * 1.0 = 10
            assert_eq!(pager.sentinel_margin(Edge::Bottom), 10.0);
            assert_eq!(pager.sentinel_margin(Edge::Top), 20.0);
        }
    }

    mod total_fitting {
        use super::*;

        #[test]
        fn short_document_lives_in_leading_page_only() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(40, &mut host);
            assert_eq!(pager.leading().size(), 40);
            assert_eq!(pager.trailing().size(), 0);
        }

        #[test]
        fn partial_last_page_shows_the_remainder() {
            let mut host = TestHost::new(1.0, 10.0, 2000);
            let mut pager = DoublePager::new(1.0, 0.0, 1000, &mut host);
            pager.set_total_lines(1500, &mut host);
            assert_eq!(pager.leading().size(), 1000);
            assert_eq!(pager.trailing().size(), 500);
            assert_eq!(
                pager.trailing().offset() - pager.leading().offset(),
                1000
            );
        }

        #[test]
        fn growing_total_expands_pages_monotonically() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(40, &mut host);
            pager.set_total_lines(150, &mut host);
            assert_eq!(pager.leading().size(), 100);
            assert_eq!(pager.trailing().size(), 50);
            pager.set_total_lines(400, &mut host);
            assert_eq!(pager.trailing().size(), 100);
        }

        #[test]
        fn host_container_heights_follow_page_sizes() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(150, &mut host);
            assert_eq!(host.heights.get("a").copied(), Some(100.0));
            assert_eq!(host.heights.get("b").copied(), Some(50.0));
        }
    }

    mod recycling_down {
        use super::*;

        fn scroll_to_bottom_sentinel(pager: &mut DoublePager, host: &mut TestHost) {
            // Scroll near the end of the two mounted pages.
            host.scroll = 185.0;
            pager.on_scroll(host);
            pager.on_sentinel(Edge::Bottom, true, host);
        }

        #[test]
        fn bottom_swap_advances_the_window_one_page() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            scroll_to_bottom_sentinel(&mut pager, &mut host);

            assert_eq!(pager.leading().offset(), 100);
            assert_eq!(pager.trailing().offset(), 200);
            assert_eq!(
                pager.leading().offset() + pager.capacity(),
                pager.trailing().offset()
            );
        }

        #[test]
        fn bottom_swap_recycles_the_old_leading_page() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            scroll_to_bottom_sentinel(&mut pager, &mut host);

            // Page A (old leading) is re-placed at the container bottom.
            assert_eq!(host.placements.last(), Some(&(PageId::A, Edge::Bottom)));
            assert_eq!(host.order, vec![PageId::B, PageId::A]);
            assert_eq!(pager.trailing().id(), PageId::A);
        }

        #[test]
        fn bottom_swap_compensates_scroll_by_one_page_height() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            scroll_to_bottom_sentinel(&mut pager, &mut host);
            assert_eq!(host.scroll, 85.0);
        }

        #[test]
        fn recycled_page_detaches_its_old_lines_under_their_old_indices() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            // Construction mounted globals [0, 9) on page A. Trigger the
            // swap without an intervening scroll pass so those mounts are
            // still live when the page is recycled.
            host.scroll = 185.0;
            host.clear_calls();
            pager.on_sentinel(Edge::Bottom, true, &mut host);

            for global in 0..9 {
                assert!(
                    host.unmounts.contains(&Call {
                        page: PageId::A,
                        global,
                        local: global,
                    }),
                    "line {global} must be detached before the page is reused"
                );
            }
        }

        #[test]
        fn bottom_swap_is_blocked_at_the_document_end() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(200, &mut host);
            host.scroll = 185.0;
            pager.on_scroll(&mut host);
            host.clear_calls();
            pager.on_sentinel(Edge::Bottom, true, &mut host);

            assert_eq!(pager.leading().offset(), 0);
            assert_eq!(pager.trailing().offset(), 100);
            assert!(host.placements.is_empty(), "no recycle at document end");
        }

        #[test]
        fn repeated_intersection_without_leaving_triggers_once() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            scroll_to_bottom_sentinel(&mut pager, &mut host);
            let offset_after_first = pager.leading().offset();

            // Still intersecting: no transition, no second swap.
            pager.on_sentinel(Edge::Bottom, true, &mut host);
            assert_eq!(pager.leading().offset(), offset_after_first);

            // Leave and re-enter: swaps again.
            pager.on_sentinel(Edge::Bottom, false, &mut host);
            host.scroll = 185.0;
            pager.on_scroll(&mut host);
            pager.on_sentinel(Edge::Bottom, true, &mut host);
            assert_eq!(pager.leading().offset(), offset_after_first + 100);
        }
    }

    mod recycling_up {
        use super::*;

        fn advance_one_page(pager: &mut DoublePager, host: &mut TestHost) {
            host.scroll = 185.0;
            pager.on_scroll(host);
            pager.on_sentinel(Edge::Bottom, true, host);
            pager.on_sentinel(Edge::Bottom, false, host);
        }

        #[test]
        fn top_swap_moves_the_window_back_one_page() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            advance_one_page(&mut pager, &mut host);
            assert_eq!(pager.leading().offset(), 100);

            host.scroll = 5.0;
            pager.on_scroll(&mut host);
            pager.on_sentinel(Edge::Top, true, &mut host);

            assert_eq!(pager.leading().offset(), 0);
            assert_eq!(pager.trailing().offset(), 100);
            assert_eq!(
                pager.leading().offset() + pager.capacity(),
                pager.trailing().offset()
            );
        }

        #[test]
        fn top_swap_recycles_the_old_trailing_page_to_the_start() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            advance_one_page(&mut pager, &mut host);
            host.scroll = 5.0;
            pager.on_scroll(&mut host);
            host.clear_calls();
            pager.on_sentinel(Edge::Top, true, &mut host);

            // After the down-swap order was [B, A]; A (old trailing) returns
            // to the top.
            assert_eq!(host.placements.last(), Some(&(PageId::A, Edge::Top)));
            assert_eq!(host.order, vec![PageId::A, PageId::B]);
        }

        #[test]
        fn top_swap_compensates_scroll_downward() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            advance_one_page(&mut pager, &mut host);
            host.scroll = 5.0;
            pager.on_scroll(&mut host);
            pager.on_sentinel(Edge::Top, true, &mut host);
            assert_eq!(host.scroll, 105.0);
        }

        #[test]
        fn top_swap_is_blocked_at_the_document_start() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);
            host.clear_calls();
            pager.on_sentinel(Edge::Top, true, &mut host);

            assert_eq!(pager.leading().offset(), 0);
            assert!(host.placements.is_empty());
        }
    }

    mod mounting {
        use super::*;

        #[test]
        fn mounts_translate_local_to_global_indices() {
            let (mut pager, mut host) = pager_with_host(1000);
            pager.set_total_lines(1000, &mut host);

            // Scroll so the viewport straddles the page boundary at 100.
            host.scroll = 95.0;
            host.clear_calls();
            pager.on_scroll(&mut host);

            for call in &host.mounts {
                let page_offset = if call.page == pager.leading().id() {
                    pager.leading().offset()
                } else {
                    pager.trailing().offset()
                };
                assert_eq!(call.global, page_offset + call.local);
            }
            // Lines from both pages are mounted across the boundary.
            assert!(host.mounts.iter().any(|call| call.global < 100));
            assert!(host.mounts.iter().any(|call| call.global >= 100));
        }

        #[test]
        fn not_ready_lines_are_retried_on_a_later_pass() {
            // Only 5 lines loaded: construction mounts [0, 5), defers the rest.
            let (mut pager, mut host) = pager_with_host(5);
            let mounted_initially = host.mounts.len();
            assert_eq!(mounted_initially, 5);

            // Loader catches up; the deferred indices mount on the next pass.
            host.loaded_lines = 1000;
            host.clear_calls();
            pager.mount_visible(&mut host);
            let globals: Vec<usize> = host.mounts.iter().map(|call| call.global).collect();
            assert_eq!(globals, (5..9).collect::<Vec<_>>());
        }
    }
}

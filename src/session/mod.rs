//! One viewing session: loader, pager, and render cache wired together.
//!
//! [`RenderSession`] owns the engine state for a single document. The host
//! (TUI, or a test harness) supplies surface concerns through [`SessionHost`]
//! and drives the session from its event loop: [`poll`](RenderSession::poll)
//! for load progress, [`on_scroll`](RenderSession::on_scroll) and
//! [`on_sentinel`](RenderSession::on_sentinel) for viewport events.
//!
//! Mount requests for lines the loader has not produced yet are declined, not
//! failed; each later pass retries them, so a fast scroll into unloaded
//! territory self-heals as batches land.

use crate::config::ViewerConfig;
use crate::loader::{IncrementalLoader, LineStore};
use crate::model::{TraversalError, Value};
use crate::pager::{DoublePager, Edge, PageId, PagerHost};
use crate::render::{LineRenderer, RenderCache};
use crate::viewport::SurfaceRect;
use std::time::Instant;
use tracing::trace;

/// Surface concerns the host provides: geometry, page placement, scrolling.
/// Everything line-level is handled inside the session.
pub trait SessionHost {
    /// Current bounding rect of a page surface, or `None` if unmeasurable.
    fn page_rect(&self, page: PageId) -> Option<SurfaceRect>;

    /// Current viewport height.
    fn viewport_height(&self) -> f64;

    /// Discard a page's content and re-place its container at `edge`.
    fn place_page(&mut self, page: PageId, edge: Edge);

    /// A page's logical height changed to `lines` items.
    fn page_resized(&mut self, page: PageId, lines: usize);

    /// Adjust the scroll position by `delta` units.
    fn scroll_by(&mut self, delta: f64);
}

/// Adapts the session's split-borrowed internals plus the host surface into
/// the [`PagerHost`] the pager drives.
struct HostBridge<'call, S, R: LineRenderer> {
    surface: &'call mut S,
    renderer: &'call mut R,
    cache: &'call mut RenderCache<R::Handle>,
    store: &'call LineStore,
    item_height: f64,
}

impl<S: SessionHost, R: LineRenderer> PagerHost for HostBridge<'_, S, R> {
    fn mount(&mut self, _page: PageId, global: usize, local: usize) -> bool {
        let Some(line) = self.store.get(global) else {
            trace!(global, "Mount deferred; line not loaded yet");
            return false;
        };
        let offset = local as f64 * self.item_height;
        self.cache.mount(self.renderer, global, line, offset);
        true
    }

    fn unmount(&mut self, _page: PageId, global: usize, _local: usize) -> bool {
        self.cache.unmount(self.renderer, global);
        true
    }

    fn page_rect(&self, page: PageId) -> Option<SurfaceRect> {
        self.surface.page_rect(page)
    }

    fn viewport_height(&self) -> f64 {
        self.surface.viewport_height()
    }

    fn place_page(&mut self, page: PageId, edge: Edge) {
        self.surface.place_page(page, edge);
    }

    fn page_resized(&mut self, page: PageId, lines: usize) {
        self.surface.page_resized(page, lines);
    }

    fn scroll_by(&mut self, delta: f64) {
        self.surface.scroll_by(delta);
    }
}

/// Engine state for viewing one document.
pub struct RenderSession<'doc, R: LineRenderer> {
    loader: IncrementalLoader<'doc>,
    pager: DoublePager,
    renderer: R,
    cache: RenderCache<R::Handle>,
    item_height: f64,
}

impl<'doc, R: LineRenderer> RenderSession<'doc, R> {
    /// Start a session: run the loader's initial batch, build the pager, and
    /// mount whatever is already visible and loaded.
    pub fn start(
        document: &'doc Value,
        config: &ViewerConfig,
        renderer: R,
        surface: &mut impl SessionHost,
    ) -> Result<Self, TraversalError> {
        let loader = IncrementalLoader::start(document, config.loader(), config.depth_limit)?;
        let mut renderer = renderer;
        let mut cache = RenderCache::new();

        let mut bridge = HostBridge {
            surface,
            renderer: &mut renderer,
            cache: &mut cache,
            store: loader.store(),
            item_height: config.item_height,
        };
        let mut pager = DoublePager::new(
            config.item_height,
            config.lookahead_margin,
            config.page_capacity,
            &mut bridge,
        );
        pager.set_total_lines(loader.store().len(), &mut bridge);
        pager.mount_visible(&mut bridge);

        Ok(Self {
            loader,
            pager,
            renderer,
            cache,
            item_height: config.item_height,
        })
    }

    /// Run a cooperative load batch if one is due, forward the grown total
    /// to the pager, and retry deferred mounts.
    ///
    /// Returns whether new lines landed.
    pub fn poll(
        &mut self,
        now: Instant,
        surface: &mut impl SessionHost,
    ) -> Result<bool, TraversalError> {
        let Some(progress) = self.loader.poll(now)? else {
            return Ok(false);
        };
        let mut bridge = HostBridge {
            surface,
            renderer: &mut self.renderer,
            cache: &mut self.cache,
            store: self.loader.store(),
            item_height: self.item_height,
        };
        self.pager.set_total_lines(progress.total_lines, &mut bridge);
        self.pager.mount_visible(&mut bridge);
        Ok(progress.loaded > 0)
    }

    /// Scroll notification: reconcile mounted lines against new geometry.
    pub fn on_scroll(&mut self, surface: &mut impl SessionHost) {
        let mut bridge = HostBridge {
            surface,
            renderer: &mut self.renderer,
            cache: &mut self.cache,
            store: self.loader.store(),
            item_height: self.item_height,
        };
        self.pager.on_scroll(&mut bridge);
    }

    /// Edge sentinel intersection report; may recycle a page.
    pub fn on_sentinel(&mut self, edge: Edge, intersecting: bool, surface: &mut impl SessionHost) {
        let mut bridge = HostBridge {
            surface,
            renderer: &mut self.renderer,
            cache: &mut self.cache,
            store: self.loader.store(),
            item_height: self.item_height,
        };
        self.pager.on_sentinel(edge, intersecting, &mut bridge);
    }

    /// The pager, for window/offset queries.
    pub fn pager(&self) -> &DoublePager {
        &self.pager
    }

    /// The loaded line store.
    pub fn store(&self) -> &LineStore {
        self.loader.store()
    }

    /// Whether every line of the document has been produced.
    pub fn is_loaded(&self) -> bool {
        self.loader.is_exhausted()
    }

    /// The renderer, for hosts that draw from its state.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Number of distinct lines rendered so far.
    pub fn rendered_lines(&self) -> usize {
        self.cache.len()
    }

    /// Rendered handle for global line `index`, if the line was ever mounted.
    pub fn handle(&self, index: usize) -> Option<&R::Handle> {
        self.cache.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineDescriptor;
    use crate::parser::parse_document;
    use std::collections::BTreeMap;
    use std::time::Duration;

    /// Flat scrollable surface: two stacked page containers, heights driven
    /// by `page_resized`, rects derived from the scroll position.
    struct TestSurface {
        item_height: f64,
        viewport_height: f64,
        scroll: f64,
        order: Vec<PageId>,
        heights: BTreeMap<&'static str, f64>,
    }

    impl TestSurface {
        fn new(viewport_height: f64) -> Self {
            Self {
                item_height: 1.0,
                viewport_height,
                scroll: 0.0,
                order: Vec::new(),
                heights: BTreeMap::new(),
            }
        }

        fn key(page: PageId) -> &'static str {
            match page {
                PageId::A => "a",
                PageId::B => "b",
            }
        }
    }

    impl SessionHost for TestSurface {
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
        }

        fn page_resized(&mut self, page: PageId, lines: usize) {
            self.heights
                .insert(Self::key(page), lines as f64 * self.item_height);
        }

        fn scroll_by(&mut self, delta: f64) {
            self.scroll += delta;
        }
    }

    /// Renderer that records every materialization.
    #[derive(Debug, Default)]
    struct TextRenderer {
        renders: Vec<usize>,
    }

    struct TextHandle {
        #[allow(dead_code)]
        text: String,
        offset: f64,
        attached: bool,
    }

    impl LineRenderer for TextRenderer {
        type Handle = TextHandle;

        fn render(&mut self, line: &LineDescriptor, offset: f64) -> TextHandle {
            self.renders.push(line.depth);
            TextHandle {
                text: format!("{:?} {:?}", line.kind, line.key),
                offset,
                attached: true,
            }
        }

        fn reposition(&mut self, handle: &mut TextHandle, offset: f64) {
            handle.offset = offset;
            handle.attached = true;
        }

        fn detach(&mut self, handle: &mut TextHandle) {
            handle.attached = false;
        }
    }

    /// `{"xs": [0, 1, ..., n-1]}`: 1 open + n elements + 1 close lines.
    fn numbers_doc(n: usize) -> Value {
        let elements: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        parse_document(&format!(r#"{{"xs": [{}]}}"#, elements.join(", "))).unwrap()
    }

    fn small_config(initial_batch: usize) -> ViewerConfig {
        ViewerConfig {
            item_height: 1.0,
            lookahead_margin: 0.0,
            page_capacity: 100,
            initial_batch,
            batch_size: 50,
            batch_delay_ms: 0,
            depth_limit: 64,
        }
    }

    #[test]
    fn start_mounts_the_visible_loaded_lines() {
        let doc = numbers_doc(200);
        let mut surface = TestSurface::new(10.0);
        let session =
            RenderSession::start(&doc, &small_config(512), TextRenderer::default(), &mut surface)
                .unwrap();

        // Viewport shows 9 rows; all are loaded.
        assert_eq!(session.rendered_lines(), 9);
        assert!(session.is_loaded());
    }

    #[test]
    fn mounts_beyond_loaded_lines_are_deferred_then_retried() {
        let doc = numbers_doc(200);
        let mut surface = TestSurface::new(10.0);
        // Only 4 lines load up front; the viewport wants 9.
        let mut session =
            RenderSession::start(&doc, &small_config(4), TextRenderer::default(), &mut surface)
                .unwrap();
        assert_eq!(session.rendered_lines(), 4);

        let landed = session.poll(Instant::now(), &mut surface).unwrap();
        assert!(landed);
        assert_eq!(session.rendered_lines(), 9);
    }

    #[test]
    fn poll_forwards_the_grown_total_to_the_pager() {
        let doc = numbers_doc(120); // 122 lines
        let mut surface = TestSurface::new(10.0);
        let mut session =
            RenderSession::start(&doc, &small_config(4), TextRenderer::default(), &mut surface)
                .unwrap();
        assert_eq!(session.pager().leading().size(), 4);

        let mut now = Instant::now();
        while !session.is_loaded() {
            session.poll(now, &mut surface).unwrap();
            now += Duration::from_millis(1);
        }
        assert_eq!(session.store().len(), 122);
        assert_eq!(session.pager().leading().size(), 100);
        assert_eq!(session.pager().trailing().size(), 22);
    }

    #[test]
    fn scrolling_back_reuses_cached_renders() {
        let doc = numbers_doc(200);
        let mut surface = TestSurface::new(10.0);
        let mut session =
            RenderSession::start(&doc, &small_config(512), TextRenderer::default(), &mut surface)
                .unwrap();
        let rendered_at_top = session.renderer().renders.len();

        surface.scroll = 50.0;
        session.on_scroll(&mut surface);
        let rendered_scrolled = session.renderer().renders.len();
        assert!(rendered_scrolled > rendered_at_top);

        surface.scroll = 0.0;
        session.on_scroll(&mut surface);
        assert_eq!(
            session.renderer().renders.len(),
            rendered_scrolled,
            "returning to a seen region renders nothing new"
        );
    }

    #[test]
    fn sentinel_recycling_flows_through_to_the_surface() {
        let doc = numbers_doc(400); // 402 lines, capacity 100
        let mut surface = TestSurface::new(10.0);
        let mut session =
            RenderSession::start(&doc, &small_config(512), TextRenderer::default(), &mut surface)
                .unwrap();
        assert!(session.is_loaded());

        surface.scroll = 185.0;
        session.on_scroll(&mut surface);
        session.on_sentinel(Edge::Bottom, true, &mut surface);

        assert_eq!(session.pager().leading().offset(), 100);
        assert_eq!(session.pager().trailing().offset(), 200);
        assert_eq!(surface.order, vec![PageId::B, PageId::A]);
        assert_eq!(surface.scroll, 85.0);
    }
}

//! Line rendering seam and the per-session handle cache.
//!
//! The engine never draws; it asks a [`LineRenderer`] to materialize a line
//! descriptor into an opaque handle the first time the line becomes visible,
//! and merely repositions the cached handle on every later mount. Handles are
//! cached for the lifetime of the session and never evicted: re-entering a
//! region after scrolling away reuses the handle instead of re-rendering, and
//! memory follows the set of lines ever seen rather than document length.

use crate::model::LineDescriptor;
use std::collections::HashMap;

/// Turns line descriptors into presentable items.
///
/// `offset` is the vertical position, in abstract units, of the line within
/// its page surface. Implementations own the actual drawing (DOM nodes,
/// terminal rows, widget trees); the engine only holds handles.
pub trait LineRenderer {
    /// Opaque rendered-line handle.
    type Handle;

    /// Materialize `line` at `offset`. Called once per distinct line.
    fn render(&mut self, line: &LineDescriptor, offset: f64) -> Self::Handle;

    /// Move an existing handle to `offset` and reattach it if detached.
    fn reposition(&mut self, handle: &mut Self::Handle, offset: f64);

    /// Detach a handle from its surface. The handle stays cached and may be
    /// repositioned back later.
    fn detach(&mut self, handle: &mut Self::Handle);
}

/// Session-lifetime cache of rendered-line handles, keyed by global line
/// index.
///
/// Entries are created on first successful mount and never removed.
#[derive(Debug)]
pub struct RenderCache<H> {
    handles: HashMap<usize, H>,
}

impl<H> Default for RenderCache<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> RenderCache<H> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the line at global `index`: render on first sight, reposition
    /// the cached handle on every later one.
    pub fn mount<R>(&mut self, renderer: &mut R, index: usize, line: &LineDescriptor, offset: f64)
    where
        R: LineRenderer<Handle = H>,
    {
        match self.handles.entry(index) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                renderer.reposition(entry.get_mut(), offset);
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(renderer.render(line, offset));
            }
        }
    }

    /// Detach the handle for global `index`, if one was ever rendered. The
    /// entry survives for reuse.
    pub fn unmount<R>(&mut self, renderer: &mut R, index: usize)
    where
        R: LineRenderer<Handle = H>,
    {
        if let Some(handle) = self.handles.get_mut(&index) {
            renderer.detach(handle);
        }
    }

    /// Handle for global `index`, if rendered at least once.
    pub fn get(&self, index: usize) -> Option<&H> {
        self.handles.get(&index)
    }

    /// Number of distinct lines ever rendered.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True before the first render.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

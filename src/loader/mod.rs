//! Cooperative batch loading of line descriptors.
//!
//! [`IncrementalLoader`] drains a [`LineSequencer`] into an append-only
//! [`LineStore`] in bounded batches so a huge document never blocks the host
//! for more than one batch's worth of work. The driving pattern is: one small
//! synchronous batch at construction (bounds perceived startup latency), then
//! larger batches gated by an inter-batch delay, driven by
//! [`poll`](IncrementalLoader::poll) from the host's event loop.
//!
//! There is no cancellation: each batch is a bounded synchronous unit, so a
//! consumer torn down mid-load simply stops polling.

use crate::model::{LineDescriptor, TraversalError, Value};
use crate::sequencer::{LineSequencer, Step};
use std::time::{Duration, Instant};
use tracing::debug;

/// Append-only, index-addressable store of produced line descriptors.
///
/// Index `i` is permanently assigned once produced and never renumbered; the
/// total length is unknown until the loader reports exhaustion.
#[derive(Debug, Default)]
pub struct LineStore {
    lines: Vec<LineDescriptor>,
}

impl LineStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor at `index`, or `None` if the loader has not reached it yet.
    pub fn get(&self, index: usize) -> Option<&LineDescriptor> {
        self.lines.get(index)
    }

    /// Number of descriptors loaded so far. Monotonically non-decreasing.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True before the first batch lands.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push(&mut self, line: LineDescriptor) {
        self.lines.push(line);
    }
}

/// Batch sizes and pacing for the loader. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Lines pulled synchronously at construction.
    pub initial_batch: usize,
    /// Lines pulled per cooperative batch thereafter.
    pub batch_size: usize,
    /// Minimum gap between cooperative batches.
    pub batch_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            initial_batch: 512,
            batch_size: 8192,
            batch_delay: Duration::from_millis(8),
        }
    }
}

/// Outcome of one cooperative batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Lines appended by this batch.
    pub loaded: usize,
    /// Total store length after the batch. Forward this to the
    /// virtualizer/pager as the new list size.
    pub total_lines: usize,
    /// Whether the sequencer is exhausted.
    pub exhausted: bool,
}

/// Drains a sequencer into a [`LineStore`] on a cooperative schedule.
#[derive(Debug)]
pub struct IncrementalLoader<'doc> {
    sequencer: LineSequencer<'doc>,
    store: LineStore,
    config: LoaderConfig,
    exhausted: bool,
    /// `None` means a batch is due immediately.
    next_batch_at: Option<Instant>,
}

impl<'doc> IncrementalLoader<'doc> {
    /// Build a loader and pull the initial synchronous batch.
    pub fn start(
        document: &'doc Value,
        config: LoaderConfig,
        depth_limit: usize,
    ) -> Result<Self, TraversalError> {
        let mut loader = Self {
            sequencer: LineSequencer::with_depth_limit(document, depth_limit),
            store: LineStore::new(),
            config,
            exhausted: false,
            next_batch_at: None,
        };
        loader.load_batch(config.initial_batch)?;
        Ok(loader)
    }

    /// Pull up to `n` steps from the sequencer and append the results.
    ///
    /// Returns whether the sequencer is exhausted. A traversal error is
    /// terminal; lines already appended remain in the store but the caller
    /// should fail the render rather than present a silent truncation.
    pub fn load_batch(&mut self, n: usize) -> Result<bool, TraversalError> {
        if self.exhausted {
            return Ok(true);
        }
        let before = self.store.len();
        for _ in 0..n {
            match self.sequencer.advance()? {
                Step::Line(line) => self.store.push(line),
                Step::Done => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        debug!(
            loaded = self.store.len() - before,
            total = self.store.len(),
            exhausted = self.exhausted,
            "Loaded line batch"
        );
        Ok(self.exhausted)
    }

    /// Run the next cooperative batch if its delay has elapsed.
    ///
    /// Returns `None` when nothing was due (already exhausted, or the
    /// inter-batch delay has not passed). The explicit `now` keeps pacing
    /// decisions testable.
    pub fn poll(&mut self, now: Instant) -> Result<Option<LoadProgress>, TraversalError> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(due) = self.next_batch_at {
            if now < due {
                return Ok(None);
            }
        }

        let before = self.store.len();
        let exhausted = self.load_batch(self.config.batch_size)?;
        self.next_batch_at = Some(now + self.config.batch_delay);
        Ok(Some(LoadProgress {
            loaded: self.store.len() - before,
            total_lines: self.store.len(),
            exhausted,
        }))
    }

    /// The shared line-descriptor store.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Whether the sequencer has been fully drained.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

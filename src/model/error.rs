//! Error taxonomy.
//!
//! Three tiers: [`TraversalError`] for terminal sequencer failures,
//! [`ParseError`] for document ingestion, and [`AppError`] wrapping both plus
//! terminal I/O for the binary. A mount callback returning `false` ("not
//! ready") is deliberately *not* an error anywhere in this hierarchy; it is a
//! retryable transient state handled by the virtualizer's bookkeeping.

use thiserror::Error;

/// Terminal traversal failure, distinguishable from normal exhaustion.
///
/// Once a sequencer reports one of these it stays failed; a malformed
/// document fails the whole render with a single error rather than
/// partially rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TraversalError {
    /// Nesting exceeded the configured depth limit. Guards against
    /// effectively unbounded recursion (e.g. a cyclic structure smuggled in
    /// through a custom ingestion path).
    #[error("Document nesting exceeded depth limit {limit}")]
    DepthExceeded {
        /// The configured maximum depth that was exceeded.
        limit: usize,
    },
}

/// Document ingestion failure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The raw bytes are not valid JSON.
    #[error("Invalid JSON: {message}")]
    InvalidJson {
        /// Parser error message, extracted from `serde_json::Error`.
        message: String,
    },

    /// The document root is a scalar; the viewer renders members of a
    /// container, so there is nothing to sequence.
    #[error("Document root must be an object or array")]
    ScalarRoot,
}

/// Top-level application error for the viewer binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to parse the input document. Fatal: there is nothing to show.
    #[error("Failed to parse document: {0}")]
    Parse(#[from] ParseError),

    /// Traversal failed mid-load. Fatal: the render would be silently
    /// truncated otherwise.
    #[error("Failed to traverse document: {0}")]
    Traversal(#[from] TraversalError),

    /// Terminal or I/O error from the crossterm/ratatui layer.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

//! Incremental pre-order traversal of a document.
//!
//! [`LineSequencer`] turns a nested [`Value`] into an ordered sequence of
//! [`LineDescriptor`]s, one per [`advance`](LineSequencer::advance) call.
//! Traversal position is held as an explicit stack of
//! (container, next-child) frames rather than suspended call-stack state, so
//! the cursor is resumable between host scheduler slices and inspectable in
//! tests. The sequence is finite and not restartable in place; build a fresh
//! sequencer to iterate again.
//!
//! Emission order matches the document:
//! - array member: `ArrayOpen`, children at depth+1 with parent=array,
//!   `ArrayClose` at the open's depth
//! - object member: `ObjectOpen`, children at depth+1 with parent=object,
//!   no close line (objects dedent implicitly)
//! - scalar member: one `Property` line

use crate::model::{LineDescriptor, ParentKind, TraversalError, Value};

/// Default nesting limit. Deep enough for any sane document, shallow enough
/// to terminate quickly if ingestion ever produced a pathological structure.
pub const DEFAULT_DEPTH_LIMIT: usize = 512;

/// Result of one traversal step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// One descriptor was produced.
    Line(LineDescriptor),
    /// The document is exhausted. Subsequent calls keep returning `Done`.
    Done,
}

/// One suspended container: where we are and which child comes next.
#[derive(Debug)]
enum Frame<'doc> {
    Object {
        members: &'doc [(String, Value)],
        next: usize,
        /// Depth of this frame's children.
        depth: usize,
    },
    Array {
        elements: &'doc [Value],
        next: usize,
        depth: usize,
        /// Root arrays get no close line; nested arrays do.
        emit_close: bool,
    },
}

impl Frame<'_> {
    fn parent_kind(&self) -> ParentKind {
        match self {
            Frame::Object { .. } => ParentKind::Object,
            Frame::Array { .. } => ParentKind::Array,
        }
    }

    fn child_depth(&self) -> usize {
        match self {
            Frame::Object { depth, .. } | Frame::Array { depth, .. } => *depth,
        }
    }
}

/// Externally driven traversal cursor over a borrowed document.
#[derive(Debug)]
pub struct LineSequencer<'doc> {
    stack: Vec<Frame<'doc>>,
    depth_limit: usize,
    failed: Option<TraversalError>,
}

impl<'doc> LineSequencer<'doc> {
    /// Start a traversal over the members of `document`.
    ///
    /// The root container itself gets no line; its members are the top-level
    /// rows at depth 0, with the root's kind as their parent kind. A scalar
    /// root yields an immediately exhausted sequence.
    pub fn new(document: &'doc Value) -> Self {
        Self::with_depth_limit(document, DEFAULT_DEPTH_LIMIT)
    }

    /// Start a traversal with an explicit nesting limit.
    pub fn with_depth_limit(document: &'doc Value, depth_limit: usize) -> Self {
        let mut stack = Vec::new();
        match document {
            Value::Object(members) => stack.push(Frame::Object {
                members,
                next: 0,
                depth: 0,
            }),
            Value::Array(elements) => stack.push(Frame::Array {
                elements,
                next: 0,
                depth: 0,
                emit_close: false,
            }),
            Value::Scalar(_) => {}
        }
        Self {
            stack,
            depth_limit,
            failed: None,
        }
    }

    /// Produce the next descriptor, or `Done` on exhaustion.
    ///
    /// A depth-limit violation is terminal: the same error is returned on
    /// every subsequent call, so a malformed document fails the render once
    /// rather than partially rendering.
    pub fn advance(&mut self) -> Result<Step, TraversalError> {
        if let Some(err) = self.failed {
            return Err(err);
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(Step::Done);
            };

            let depth = frame.child_depth();
            let parent = frame.parent_kind();

            let child: Option<(String, &'doc Value)> = match frame {
                Frame::Object { members, next, .. } => {
                    members.get(*next).map(|(key, value)| {
                        *next += 1;
                        (key.clone(), value)
                    })
                }
                Frame::Array { elements, next, .. } => elements.get(*next).map(|value| {
                    let key = next.to_string();
                    *next += 1;
                    (key, value)
                }),
            };

            match child {
                Some((key, Value::Scalar(scalar))) => {
                    return Ok(Step::Line(LineDescriptor::property(
                        key,
                        scalar.clone(),
                        depth,
                        parent,
                    )));
                }
                Some((key, Value::Array(elements))) => {
                    self.check_depth(depth + 1)?;
                    self.stack.push(Frame::Array {
                        elements,
                        next: 0,
                        depth: depth + 1,
                        emit_close: true,
                    });
                    return Ok(Step::Line(LineDescriptor::array_open(key, depth, parent)));
                }
                Some((key, Value::Object(members))) => {
                    self.check_depth(depth + 1)?;
                    self.stack.push(Frame::Object {
                        members,
                        next: 0,
                        depth: depth + 1,
                    });
                    return Ok(Step::Line(LineDescriptor::object_open(key, depth, parent)));
                }
                None => {
                    // Container exhausted: arrays close at the open's depth,
                    // objects just dedent.
                    let finished = self.stack.pop().expect("frame checked above");
                    if let Frame::Array {
                        depth, emit_close, ..
                    } = finished
                    {
                        if emit_close {
                            return Ok(Step::Line(LineDescriptor::array_close(depth - 1)));
                        }
                    }
                }
            }
        }
    }

    /// Current suspension depth (number of open containers).
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn check_depth(&mut self, depth: usize) -> Result<(), TraversalError> {
        if depth >= self.depth_limit {
            let err = TraversalError::DepthExceeded {
                limit: self.depth_limit,
            };
            self.failed = Some(err);
            return Err(err);
        }
        Ok(())
    }
}

impl Iterator for LineSequencer<'_> {
    type Item = Result<LineDescriptor, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Step::Line(line)) => Some(Ok(line)),
            Ok(Step::Done) => None,
            Err(_) => {
                // The error stays observable via advance(); the iterator just
                // ends so a for-loop consumer does not spin on the sticky
                // failure.
                None
            }
        }
    }
}

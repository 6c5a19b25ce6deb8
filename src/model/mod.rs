//! Domain types: document values, line descriptors, and the error taxonomy.

pub mod error;
pub mod line;
pub mod value;

pub use error::{AppError, ParseError, TraversalError};
pub use line::{LineDescriptor, LineKind, ParentKind};
pub use value::{count_lines, Scalar, Value};

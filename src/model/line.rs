//! Line descriptors: one logical row of the rendered document.

use super::value::Scalar;

/// Which container directly encloses a line. Styling hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    /// Enclosed by an object.
    Object,
    /// Enclosed by an array.
    Array,
}

/// The role a line plays in the serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `key: [` opening an array.
    ArrayOpen,
    /// `]` closing an array. Carries no key.
    ArrayClose,
    /// `key:` opening an object. Objects close implicitly via dedent.
    ObjectOpen,
    /// `key: value` scalar property.
    Property,
}

/// One visual row of the document.
///
/// The sequence of descriptors, read in order, is a valid pre-order
/// serialization of the document: every `ArrayOpen` at depth d is matched by
/// exactly one `ArrayClose` at depth d, and object nesting is expressed by
/// indentation alone.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDescriptor {
    /// Role of this row.
    pub kind: LineKind,
    /// Member key or array element index. Absent on `ArrayClose`.
    pub key: Option<String>,
    /// Scalar payload. Present only on `Property` lines.
    pub value: Option<Scalar>,
    /// Nesting level; children sit at their container's depth + 1.
    pub depth: usize,
    /// Kind of the directly enclosing container.
    pub parent: ParentKind,
}

impl LineDescriptor {
    /// Property line for a scalar member.
    pub fn property(key: String, value: Scalar, depth: usize, parent: ParentKind) -> Self {
        Self {
            kind: LineKind::Property,
            key: Some(key),
            value: Some(value),
            depth,
            parent,
        }
    }

    /// `key: [` line.
    pub fn array_open(key: String, depth: usize, parent: ParentKind) -> Self {
        Self {
            kind: LineKind::ArrayOpen,
            key: Some(key),
            value: None,
            depth,
            parent,
        }
    }

    /// `]` line at the depth of the matching open.
    pub fn array_close(depth: usize) -> Self {
        Self {
            kind: LineKind::ArrayClose,
            key: None,
            value: None,
            depth,
            parent: ParentKind::Array,
        }
    }

    /// `key:` line opening an object.
    pub fn object_open(key: String, depth: usize, parent: ParentKind) -> Self {
        Self {
            kind: LineKind::ObjectOpen,
            key: Some(key),
            value: None,
            depth,
            parent,
        }
    }
}

//! Edit operation types.
//!
//! Represents the steps of an edit script produced by the sequence aligner.

use std::fmt;

/// Kinds of operations in an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Element present in the first sequence only.
    Delete,
    /// Element present in both sequences.
    Same,
    /// Element present in the second sequence only.
    Add,
}

impl EditKind {
    /// Returns the kind an entry must have to pair with this one.
    ///
    /// `Same` entries never pair, so they have no complement.
    pub fn complement(self) -> Option<EditKind> {
        match self {
            EditKind::Delete => Some(EditKind::Add),
            EditKind::Add => Some(EditKind::Delete),
            EditKind::Same => None,
        }
    }

    /// Returns the marker used by [`serialize_edits`](super::serialize_edits).
    pub fn marker(self) -> char {
        match self {
            EditKind::Delete => '-',
            EditKind::Same => '=',
            EditKind::Add => '+',
        }
    }
}

/// A single step of an edit script.
///
/// `Delete` and `Add` carry the element's position in its own sequence in
/// both index fields. `Same` carries its position in the first sequence as
/// `a_index` and in the second as `b_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp<T> {
    /// The type of operation.
    pub kind: EditKind,
    /// The element the operation applies to.
    pub element: T,
    /// Position in the first sequence (see type docs).
    pub a_index: usize,
    /// Position in the second sequence (see type docs).
    pub b_index: usize,
}

impl<T> EditOp<T> {
    /// Creates a delete operation for `element` at `index` of the first sequence.
    pub fn delete(element: T, index: usize) -> Self {
        EditOp {
            kind: EditKind::Delete,
            element,
            a_index: index,
            b_index: index,
        }
    }

    /// Creates an add operation for `element` at `index` of the second sequence.
    pub fn add(element: T, index: usize) -> Self {
        EditOp {
            kind: EditKind::Add,
            element,
            a_index: index,
            b_index: index,
        }
    }

    /// Creates a same operation.
    pub fn same(element: T, a_index: usize, b_index: usize) -> Self {
        EditOp {
            kind: EditKind::Same,
            element,
            a_index,
            b_index,
        }
    }

    /// Position of the element in the sequence it was taken from.
    pub fn index(&self) -> usize {
        match self.kind {
            EditKind::Add => self.b_index,
            EditKind::Delete | EditKind::Same => self.a_index,
        }
    }

    pub fn is_delete(&self) -> bool {
        self.kind == EditKind::Delete
    }

    pub fn is_add(&self) -> bool {
        self.kind == EditKind::Add
    }
}

impl<T: fmt::Display> fmt::Display for EditOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}[{}<->{}]",
            self.kind.marker(),
            self.element,
            self.a_index,
            self.b_index
        )
    }
}

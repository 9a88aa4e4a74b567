//! Structured difference records.

use std::fmt;

use crate::diff::EditOp;
use crate::matching::EditPairing;
use crate::node::{NodeRef, XmlAttribute};

/// Category of a recorded difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Name,
    Namespace,
    Text,
    Attributes,
    Children,
    ChildrenOrder,
    ParseFailure,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Name => "name",
            DiffKind::Namespace => "namespace",
            DiffKind::Text => "text",
            DiffKind::Attributes => "attributes",
            DiffKind::Children => "children",
            DiffKind::ChildrenOrder => "children-order",
            DiffKind::ParseFailure => "parse-failure",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two inputs a parse failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    First,
    Second,
}

impl Sample {
    fn ordinal(&self) -> &'static str {
        match self {
            Sample::First => "first",
            Sample::Second => "second",
        }
    }
}

/// A single difference between two documents.
///
/// Records keep the data needed to render their message. Attribute and
/// children records keep the underlying edit script, and their message is
/// derived from it when rendered.
#[derive(Debug, Clone)]
pub enum DiffRecord {
    NameMismatch {
        name1: String,
        name2: String,
        path: String,
    },
    NamespaceMismatch {
        namespace1: String,
        namespace2: String,
        path: String,
    },
    TextMismatch {
        text1: String,
        text2: String,
        path: String,
    },
    AttributesMismatch {
        edits: Vec<EditOp<XmlAttribute>>,
        count1: usize,
        count2: usize,
        path: String,
    },
    ChildrenMismatch {
        edits: Vec<EditOp<NodeRef>>,
        count1: usize,
        count2: usize,
        path: String,
    },
    ChildrenOrderMismatch {
        count: usize,
        path: String,
    },
    ParseFailure {
        sample: Sample,
        cause: String,
    },
}

impl DiffRecord {
    pub fn kind(&self) -> DiffKind {
        match self {
            DiffRecord::NameMismatch { .. } => DiffKind::Name,
            DiffRecord::NamespaceMismatch { .. } => DiffKind::Namespace,
            DiffRecord::TextMismatch { .. } => DiffKind::Text,
            DiffRecord::AttributesMismatch { .. } => DiffKind::Attributes,
            DiffRecord::ChildrenMismatch { .. } => DiffKind::Children,
            DiffRecord::ChildrenOrderMismatch { .. } => DiffKind::ChildrenOrder,
            DiffRecord::ParseFailure { .. } => DiffKind::ParseFailure,
        }
    }

    /// Path of the node in the first document, if the record has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            DiffRecord::NameMismatch { path, .. }
            | DiffRecord::NamespaceMismatch { path, .. }
            | DiffRecord::TextMismatch { path, .. }
            | DiffRecord::AttributesMismatch { path, .. }
            | DiffRecord::ChildrenMismatch { path, .. }
            | DiffRecord::ChildrenOrderMismatch { path, .. } => Some(path),
            DiffRecord::ParseFailure { .. } => None,
        }
    }

    /// Renders the message for this record.
    ///
    /// A children record whose entries all pair up renders as an empty
    /// string; the recorder drops it.
    pub fn describe(&self) -> String {
        match self {
            DiffRecord::NameMismatch { name1, name2, path } => {
                format!("Node names differ: '{}' vs '{}', path='{}'", name1, name2, path)
            }
            DiffRecord::NamespaceMismatch {
                namespace1,
                namespace2,
                path,
            } => format!(
                "Node namespaces differ: '{}' vs '{}', path='{}'",
                namespace1, namespace2, path
            ),
            DiffRecord::TextMismatch { text1, text2, path } => {
                format!("Node texts differ: '{}' vs '{}', path='{}'", text1, text2, path)
            }
            DiffRecord::AttributesMismatch {
                edits,
                count1,
                count2,
                path,
            } => {
                let pairing = EditPairing::build(edits);
                let mut parts = Vec::new();
                if pairing.has_unpaired() {
                    parts.push(format!(
                        "counts {} vs {}: {}",
                        count1,
                        count2,
                        pairing.unpaired_names(edits)
                    ));
                }
                for (deleted, added) in pairing.paired_ops(edits) {
                    parts.push(format!("'{}' vs '{}'", deleted.element, added.element));
                }
                format!("Attributes differ: {}, path='{}'", parts.join(", "), path)
            }
            DiffRecord::ChildrenMismatch {
                edits,
                count1,
                count2,
                path,
            } => {
                let pairing = EditPairing::build(edits);
                if !pairing.has_unpaired() {
                    return String::new();
                }
                format!(
                    "Children differ: counts {} vs {}: {}, path='{}'",
                    count1,
                    count2,
                    pairing.unpaired_names(edits),
                    path
                )
            }
            DiffRecord::ChildrenOrderMismatch { count, path } => {
                format!("Children order differ for {} nodes, path='{}'", count, path)
            }
            DiffRecord::ParseFailure { sample, cause } => {
                format!("Can't parse the {} sample: {}", sample.ordinal(), cause)
            }
        }
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

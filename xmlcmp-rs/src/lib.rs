//! xml-cmp - semantic XML comparison
//!
//! This library reports every structural and textual difference between two
//! XML documents while tolerating differences that do not change meaning:
//! attribute order, surrounding whitespace and number formatting. Reordered
//! children are reported as such rather than as a list of edits.
//!
//! # Overview
//!
//! Both documents are parsed into trees whose nodes carry a structural hash
//! of their subtree. The trees are then walked in lock-step. At every node
//! the name, namespace, text, attributes and children are compared; ordered
//! collections are reconciled with an O(NP) sequence aligner, and deleted
//! and added children sharing a name are compared recursively so that a
//! modification deep in the tree is reported where it happened.
//!
//! # Example
//!
//! ```
//! let messages = xml_cmp::compare(
//!     "<a><b>1.0</b><c x='1' y='2'/></a>",
//!     "<a><b>1</b><c y='2' x='1'/></a>",
//!     false,
//! );
//! assert!(messages.is_empty());
//! ```

pub mod compare;
pub mod constants;
pub mod diff;
pub mod error;
pub mod matching;
pub mod measure;
pub mod node;
pub mod xml;

// Re-export commonly used types
pub use compare::{
    compare, compare_with_ignore_list, compute_differences, CompareOptions, DiffKind, DiffRecord,
    DiffRecorder, Sample, TreeComparator, Verdict, XmlComparator,
};
pub use constants::*;
pub use diff::{
    compare_sequences, compare_sequences_ex, serialize_edits, AlignOptions, EditKind, EditOp,
};
pub use error::{Error, Result};
pub use matching::{EditPairing, MatchName};
pub use node::{new_node_ref, ExpandedName, NodeInner, NodeRef, XmlAttribute};
pub use xml::{parse_file, parse_str, XmlParser};

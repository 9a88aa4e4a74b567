//! Recursive tree comparison.
//!
//! Two nodes are compared in stages: name, namespace, own text, attributes,
//! then children. Children are first checked by structural hash; only when
//! they neither match exactly nor form a permutation are they aligned, and
//! deleted/added children sharing a name are compared recursively.

use super::record::DiffRecord;
use super::recorder::DiffRecorder;
use super::CompareOptions;
use crate::diff::{compare_sequences_ex, AlignOptions, EditOp};
use crate::matching::EditPairing;
use crate::measure::texts_equal;
use crate::node::{NodeInner, NodeRef, XmlAttribute};

/// Outcome of comparing two subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No difference was recorded.
    Equivalent,
    /// At least one difference was recorded.
    Different,
    /// A difference was recorded and the run must stop.
    Halt,
}

/// Walks two trees in lock-step, reporting to a recorder.
pub struct TreeComparator<'a> {
    options: &'a CompareOptions,
    recorder: &'a mut DiffRecorder,
    align: AlignOptions,
}

impl<'a> TreeComparator<'a> {
    pub fn new(options: &'a CompareOptions, recorder: &'a mut DiffRecorder) -> Self {
        let align = AlignOptions::default().with_max_vertices(options.max_vertices);
        TreeComparator {
            options,
            recorder,
            align,
        }
    }

    /// Compares two subtrees. Records carry paths in the first tree.
    ///
    /// Recursion only descends into paired children that differ, one stack
    /// frame per level. Documents nested tens of thousands of levels deep
    /// need a thread with a larger stack.
    pub fn compare_nodes(&mut self, node1: &NodeRef, node2: &NodeRef) -> Verdict {
        tracing::trace!(
            first = %node1.borrow(),
            second = %node2.borrow(),
            "comparing nodes"
        );

        let stages: [fn(&mut Self, &NodeRef, &NodeRef) -> bool; 4] = [
            Self::compare_names,
            Self::compare_namespaces,
            Self::compare_texts,
            Self::compare_attributes,
        ];

        let mut verdict = Verdict::Equivalent;
        for stage in stages {
            if stage(self, node1, node2) {
                if self.options.stop_on_first {
                    return Verdict::Halt;
                }
                verdict = Verdict::Different;
            }
        }

        match self.compare_children(node1, node2) {
            Verdict::Halt => Verdict::Halt,
            Verdict::Different => Verdict::Different,
            Verdict::Equivalent => verdict,
        }
    }

    /// Records `record` and reports whether it was retained.
    fn record(&mut self, record: DiffRecord) -> bool {
        self.recorder.add_diff(record)
    }

    fn compare_names(&mut self, node1: &NodeRef, node2: &NodeRef) -> bool {
        let name1 = node1.borrow().local_name().to_string();
        let name2 = node2.borrow().local_name().to_string();
        if name1 == name2 {
            return false;
        }
        self.record(DiffRecord::NameMismatch {
            name1,
            name2,
            path: NodeInner::path(node1),
        })
    }

    /// Namespaces are compared only when both nodes have one, and each
    /// ordered pair of namespaces is reported once per run.
    fn compare_namespaces(&mut self, node1: &NodeRef, node2: &NodeRef) -> bool {
        let namespace1 = node1.borrow().namespace().to_string();
        let namespace2 = node2.borrow().namespace().to_string();
        if namespace1 == namespace2 || namespace1.is_empty() || namespace2.is_empty() {
            return false;
        }
        if !self.recorder.are_namespaces_new(&namespace1, &namespace2) {
            return false;
        }
        self.record(DiffRecord::NamespaceMismatch {
            namespace1,
            namespace2,
            path: NodeInner::path(node1),
        })
    }

    fn compare_texts(&mut self, node1: &NodeRef, node2: &NodeRef) -> bool {
        let (text1, text2) = {
            let (n1, n2) = (node1.borrow(), node2.borrow());
            if texts_equal(n1.char_data(), n2.char_data()) {
                return false;
            }
            (n1.text().to_string(), n2.text().to_string())
        };
        self.record(DiffRecord::TextMismatch {
            text1,
            text2,
            path: NodeInner::path(node1),
        })
    }

    fn compare_attributes(&mut self, node1: &NodeRef, node2: &NodeRef) -> bool {
        let attrs1 = plain_attributes(node1);
        let attrs2 = plain_attributes(node2);
        if attrs1 == attrs2 {
            return false;
        }

        let sorted1 = sorted_by_name(&attrs1);
        let sorted2 = sorted_by_name(&attrs2);
        if sorted1 == sorted2 {
            return false;
        }

        let edits = compare_sequences_ex(&sorted1, &sorted2, |a, b| a == b, &self.align);
        self.record(DiffRecord::AttributesMismatch {
            edits,
            count1: attrs1.len(),
            count2: attrs2.len(),
            path: NodeInner::path(node1),
        })
    }

    fn compare_children(&mut self, node1: &NodeRef, node2: &NodeRef) -> Verdict {
        let children1 = node1.borrow().children().to_vec();
        let children2 = node2.borrow().children().to_vec();
        let hashes1 = child_hashes(&children1);
        let hashes2 = child_hashes(&children2);
        if hashes1 == hashes2 {
            return Verdict::Equivalent;
        }

        if hashes1.len() == hashes2.len() {
            let (mut sorted1, mut sorted2) = (hashes1, hashes2);
            sorted1.sort_unstable();
            sorted2.sort_unstable();
            if sorted1 == sorted2 {
                let path = NodeInner::path(node1);
                tracing::debug!(%path, count = sorted1.len(), "children permuted");
                let retained = self.record(DiffRecord::ChildrenOrderMismatch {
                    count: sorted1.len(),
                    path,
                });
                return self.verdict_for(retained);
            }
        }

        let edits: Vec<EditOp<NodeRef>> = compare_sequences_ex(
            &children1,
            &children2,
            |a, b| NodeInner::hash_of(a) == NodeInner::hash_of(b),
            &self.align,
        );
        let pairing = EditPairing::build(&edits);
        let before = self.recorder.len();

        let retained = self.record(DiffRecord::ChildrenMismatch {
            edits: edits.clone(),
            count1: children1.len(),
            count2: children2.len(),
            path: NodeInner::path(node1),
        });
        if retained && self.options.stop_on_first {
            return Verdict::Halt;
        }

        for (deleted, added) in pairing.paired_ops(&edits) {
            if self.compare_nodes(&deleted.element, &added.element) == Verdict::Halt {
                return Verdict::Halt;
            }
        }

        if self.recorder.len() > before {
            Verdict::Different
        } else {
            Verdict::Equivalent
        }
    }

    fn verdict_for(&self, retained: bool) -> Verdict {
        match (retained, self.options.stop_on_first) {
            (false, _) => Verdict::Equivalent,
            (true, true) => Verdict::Halt,
            (true, false) => Verdict::Different,
        }
    }
}

/// Attributes of a node other than namespace declarations.
fn plain_attributes(node: &NodeRef) -> Vec<XmlAttribute> {
    node.borrow()
        .attributes()
        .iter()
        .filter(|a| !a.is_namespace_decl())
        .cloned()
        .collect()
}

fn sorted_by_name(attributes: &[XmlAttribute]) -> Vec<XmlAttribute> {
    let mut sorted = attributes.to_vec();
    sorted.sort_by(XmlAttribute::cmp_by_name);
    sorted
}

fn child_hashes(children: &[NodeRef]) -> Vec<u32> {
    children.iter().map(NodeInner::hash_of).collect()
}

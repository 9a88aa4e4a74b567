//! Pairing of deleted and added entries in an edit script.
//!
//! When two ordered collections (attributes, children) differ, an entry
//! deleted from the first and an entry added to the second that share a
//! name are most likely the same thing modified. This module pairs them up
//! so they can be compared against each other, and summarizes whatever is
//! left unpaired.

use crate::diff::{EditKind, EditOp};
use crate::node::{NodeRef, XmlAttribute};

/// Name used to decide whether a deleted and an added entry correspond.
pub trait MatchName {
    fn match_name(&self) -> String;
}

impl MatchName for XmlAttribute {
    fn match_name(&self) -> String {
        self.local_name().to_string()
    }
}

impl MatchName for NodeRef {
    fn match_name(&self) -> String {
        self.borrow().local_name().to_string()
    }
}

/// Result of pairing an edit script.
///
/// Indices refer to the edit script the pairing was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPairing {
    /// `(delete, add)` index pairs, in the order they were found.
    pairs: Vec<(usize, usize)>,
    /// Entries left without a partner, in script order.
    unpaired: Vec<usize>,
}

impl EditPairing {
    /// Pairs `Delete` and `Add` entries with equal names.
    ///
    /// The script is scanned front to back. Each entry not yet claimed as a
    /// partner takes the first later unclaimed entry of the complementary
    /// kind with the same name. `Same` entries never pair.
    pub fn build<T: MatchName>(ops: &[EditOp<T>]) -> Self {
        let names: Vec<String> = ops.iter().map(|op| op.element.match_name()).collect();
        let mut partner_of: Vec<Option<usize>> = vec![None; ops.len()];
        let mut claimed = vec![false; ops.len()];
        let mut pairs = Vec::new();

        for i in 0..ops.len() {
            if claimed[i] {
                continue;
            }
            let Some(wanted) = ops[i].kind.complement() else {
                continue;
            };
            let found = (i + 1..ops.len())
                .find(|&j| !claimed[j] && ops[j].kind == wanted && names[i] == names[j]);
            if let Some(j) = found {
                claimed[j] = true;
                partner_of[i] = Some(j);
                partner_of[j] = Some(i);
                if ops[i].is_delete() {
                    pairs.push((i, j));
                } else {
                    pairs.push((j, i));
                }
            }
        }

        let unpaired = (0..ops.len())
            .filter(|&i| partner_of[i].is_none() && ops[i].kind != EditKind::Same)
            .collect();

        EditPairing { pairs, unpaired }
    }

    /// `(delete, add)` index pairs.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Indices of unpaired entries.
    pub fn unpaired(&self) -> &[usize] {
        &self.unpaired
    }

    pub fn has_unpaired(&self) -> bool {
        !self.unpaired.is_empty()
    }

    /// Iterates over paired operations, deleted side first.
    pub fn paired_ops<'a, T>(
        &'a self,
        ops: &'a [EditOp<T>],
    ) -> impl Iterator<Item = (&'a EditOp<T>, &'a EditOp<T>)> + 'a {
        self.pairs.iter().map(move |&(d, a)| (&ops[d], &ops[a]))
    }

    /// Summarizes unpaired entries as run-length names, deletions first.
    ///
    /// A run is a stretch of consecutive unpaired entries of one kind. It is
    /// rendered with the first entry's name and index, followed by `:+n` for
    /// deletions or `:-n` for additions, e.g. `c[0]:+2, e[1]:-3`.
    pub fn unpaired_names<T: MatchName>(&self, ops: &[EditOp<T>]) -> String {
        let unpaired: Vec<&EditOp<T>> = self.unpaired.iter().map(|&i| &ops[i]).collect();
        let mut names = runs_of(&unpaired, EditKind::Delete, '+');
        names.extend(runs_of(&unpaired, EditKind::Add, '-'));
        names.join(", ")
    }
}

fn runs_of<T: MatchName>(entries: &[&EditOp<T>], kind: EditKind, sign: char) -> Vec<String> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, op) in entries.iter().enumerate() {
        match (op.kind == kind, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(render_run(entries[s], sign, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(render_run(entries[s], sign, entries.len() - s));
    }

    runs
}

fn render_run<T: MatchName>(first: &EditOp<T>, sign: char, count: usize) -> String {
    format!("{}[{}]:{}{}", first.element.match_name(), first.index(), sign, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare_sequences;

    impl MatchName for &str {
        /// Names are the leading letter, so `d1` and `d2` correspond.
        fn match_name(&self) -> String {
            self.chars().take(1).collect()
        }
    }

    #[test]
    fn test_pairs_same_name() {
        let ops = compare_sequences(&["c", "d1"], &["d2", "e"]);
        let pairing = EditPairing::build(&ops);

        let pairs: Vec<_> = pairing
            .paired_ops(&ops)
            .map(|(d, a)| (d.element, a.element))
            .collect();
        assert_eq!(pairs, [("d1", "d2")]);
        assert_eq!(pairing.unpaired_names(&ops), "c[0]:+1, e[1]:-1");
    }

    #[test]
    fn test_runs_of_consecutive_entries() {
        let ops = compare_sequences(&["c", "c", "d"], &["d", "e", "e", "e"]);
        let pairing = EditPairing::build(&ops);
        assert!(pairing.pairs().is_empty());
        assert_eq!(pairing.unpaired().len(), 5);
        assert_eq!(pairing.unpaired_names(&ops), "c[0]:+2, e[1]:-3");
    }

    #[test]
    fn test_runs_broken_by_other_kind() {
        let ops = vec![
            EditOp::delete("a", 0),
            EditOp::add("x", 0),
            EditOp::delete("b", 2),
        ];
        let pairing = EditPairing::build(&ops);
        assert_eq!(pairing.unpaired_names(&ops), "a[0]:+1, b[2]:+1, x[0]:-1");
    }

    #[test]
    fn test_run_spans_different_names() {
        let ops = vec![EditOp::delete("a", 0), EditOp::delete("b", 1)];
        let pairing = EditPairing::build(&ops);
        assert_eq!(pairing.unpaired_names(&ops), "a[0]:+2");
    }

    #[test]
    fn test_add_before_delete_is_oriented() {
        let ops = vec![EditOp::add("k2", 0), EditOp::delete("k1", 0)];
        let pairing = EditPairing::build(&ops);
        assert_eq!(pairing.pairs(), &[(1, 0)]);
        assert!(!pairing.has_unpaired());
        assert_eq!(pairing.unpaired_names(&ops), "");
    }

    #[test]
    fn test_each_entry_pairs_once() {
        let ops = vec![
            EditOp::delete("a1", 0),
            EditOp::delete("a2", 1),
            EditOp::add("a3", 0),
        ];
        let pairing = EditPairing::build(&ops);
        assert_eq!(pairing.pairs(), &[(0, 2)]);
        assert_eq!(pairing.unpaired(), &[1]);
    }

    #[test]
    fn test_same_entries_never_pair() {
        let ops = vec![EditOp::same("a1", 0, 0), EditOp::add("a2", 1)];
        let pairing = EditPairing::build(&ops);
        assert!(pairing.pairs().is_empty());
        assert_eq!(pairing.unpaired(), &[1]);
    }
}

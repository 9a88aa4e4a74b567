//! Sequence alignment.
//!
//! Computes a shortest edit script between two sequences with the O(NP)
//! algorithm. The comparator uses it to align children by structural hash and
//! attribute lists by full equality, but the aligner itself is generic over
//! the element type and its equality predicate.

mod aligner;
mod edit_op;

pub use edit_op::{EditKind, EditOp};

use crate::constants::DEFAULT_MAX_VERTICES;
use aligner::Aligner;
use std::fmt::Display;

/// Controls how an alignment is computed and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignOptions {
    /// Emit `Same` operations for matched elements.
    pub record_same: bool,
    /// Upper bound on edit graph vertices explored. Once exceeded, the edit
    /// script found so far is returned and the tails are left unaligned.
    pub max_vertices: usize,
}

impl Default for AlignOptions {
    fn default() -> Self {
        AlignOptions {
            record_same: false,
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

impl AlignOptions {
    pub fn with_same(mut self, record_same: bool) -> Self {
        self.record_same = record_same;
        self
    }

    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }
}

/// Aligns two sequences using `==` and default options.
///
/// Only `Delete` and `Add` operations are returned.
pub fn compare_sequences<T>(a: &[T], b: &[T]) -> Vec<EditOp<T>>
where
    T: Clone + PartialEq,
{
    compare_sequences_ex(a, b, |x, y| x == y, &AlignOptions::default())
}

/// Aligns two sequences with a custom equality predicate.
///
/// Operations are emitted in alignment order. `Delete` indices refer to `a`,
/// `Add` indices refer to `b`.
pub fn compare_sequences_ex<T, F>(
    a: &[T],
    b: &[T],
    equals: F,
    options: &AlignOptions,
) -> Vec<EditOp<T>>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    Aligner::new(a, b, equals, options).run()
}

/// Renders an edit script one operation per line, e.g. `-c[2<->2]`.
pub fn serialize_edits<T: Display>(ops: &[EditOp<T>]) -> String {
    let mut out = String::new();
    for op in ops {
        out.push_str(&op.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compact rendering used to compare scripts: `D c2`, `A d2`, `S a0,0`.
    fn script<T: Display>(ops: &[EditOp<T>]) -> Vec<String> {
        ops.iter()
            .map(|op| match op.kind {
                EditKind::Delete => format!("D {}{}", op.element, op.a_index),
                EditKind::Add => format!("A {}{}", op.element, op.b_index),
                EditKind::Same => format!("S {}{},{}", op.element, op.a_index, op.b_index),
            })
            .collect()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn diff(a: &str, b: &str) -> Vec<String> {
        script(&compare_sequences(&chars(a), &chars(b)))
    }

    fn diff_capped(a: &str, b: &str, cap: usize) -> Vec<String> {
        let options = AlignOptions::default().with_max_vertices(cap);
        script(&compare_sequences_ex(&chars(a), &chars(b), |x, y| x == y, &options))
    }

    #[test]
    fn test_single_substitution() {
        assert_eq!(diff("abc", "abd"), ["D c2", "A d2"]);
    }

    #[test]
    fn test_classic_pairs() {
        assert_eq!(
            diff("abcdef", "dacfea"),
            ["A d0", "D b1", "D d3", "D e4", "A e4", "A a5"]
        );
        assert_eq!(
            diff("acbdeacbed", "acebdabbabed"),
            ["A e2", "D e4", "D c6", "A b7", "A a8", "A b9"]
        );
        assert_eq!(diff("abcbda", "bdcaba"), ["D a0", "A d1", "A a3", "D d4"]);
    }

    #[test]
    fn test_single_insertion() {
        assert_eq!(diff("bokko", "bokkko"), ["A k4"]);
    }

    #[test]
    fn test_two_substitutions_far_apart() {
        assert_eq!(
            diff("abcaaaaaabd", "abdaaaaaabc"),
            ["D c2", "A d2", "D d10", "A c10"]
        );
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(diff("", "b"), ["A b0"]);
        assert_eq!(diff("a", ""), ["D a0"]);
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn test_identical_sequences() {
        assert!(diff("xml", "xml").is_empty());
    }

    #[test]
    fn test_reversal() {
        assert_eq!(
            diff("abcd", "dcba"),
            ["D a0", "D b1", "D c2", "A c1", "A b2", "A a3"]
        );
        assert_eq!(
            diff("dcba", "abcd"),
            ["D d0", "D c1", "D b2", "A b1", "A c2", "A d3"]
        );
        assert_eq!(diff("bc", "cb"), ["D b0", "A b1"]);
    }

    #[test]
    fn test_different_lengths() {
        assert_eq!(diff("ccd", "deee"), ["D c0", "D c1", "A e1", "A e2", "A e3"]);
    }

    #[test]
    fn test_integers() {
        let ops = compare_sequences(
            &[1, 2, 3, 4, 5, 6, 6, 6, 7, 8, 9],
            &[1, 2, 3, 4, 5, 0, 7, 8, 9],
        );
        assert_eq!(script(&ops), ["D 65", "D 66", "D 67", "A 05"]);
    }

    #[test]
    fn test_custom_equality() {
        let a = vec!["c".to_string(), "d1".to_string()];
        let b = vec!["d2".to_string(), "e".to_string()];
        let ops = compare_sequences_ex(&a, &b, |x, y| x == y, &AlignOptions::default());
        assert_eq!(script(&ops), ["D c0", "D d11", "A d20", "A e1"]);

        let by_first_char = |x: &String, y: &String| x.chars().next() == y.chars().next();
        let ops = compare_sequences_ex(&a, &b, by_first_char, &AlignOptions::default());
        assert_eq!(ops.len(), 2);
        assert!(ops[0].is_delete());
        assert_eq!(ops[0].element, "c");
        assert!(ops[1].is_add());
        assert_eq!(ops[1].element, "e");
    }

    #[test]
    fn test_record_same() {
        let options = AlignOptions::default().with_same(true);
        let ops = compare_sequences_ex(&chars("abc"), &chars("abd"), |x, y| x == y, &options);
        assert_eq!(script(&ops), ["S a0,0", "S b1,1", "D c2", "A d2"]);

        let ops = compare_sequences_ex(&chars("ab"), &chars("xab"), |x, y| x == y, &options);
        assert_eq!(script(&ops), ["A x0", "S a0,1", "S b1,2"]);
    }

    #[test]
    fn test_vertex_cap_truncates() {
        assert_eq!(diff_capped("abc", "abd", 1), ["D c2", "A d2"]);
        assert_eq!(diff_capped("abcd", "dcba", 1), ["D a0", "A d0"]);
        assert_eq!(diff_capped("abcaaaaaabd", "abdaaaaaabc", 2), ["D c2", "A d2"]);
    }

    #[test]
    fn test_zero_cap_terminates() {
        let ops = diff_capped("abcd", "dcba", 0);
        assert!(ops.len() <= 8);
    }

    #[test]
    fn test_serialize_edits() {
        let ops = compare_sequences(&chars("abc"), &chars("abd"));
        assert_eq!(serialize_edits(&ops), "-c[2<->2]\n+d[2<->2]\n");
        assert_eq!(serialize_edits::<char>(&[]), "");
    }
}

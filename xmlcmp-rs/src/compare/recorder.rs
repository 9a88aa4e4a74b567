//! Collection and filtering of difference records.

use regex::Regex;
use rustc_hash::FxHashSet;

use super::record::{DiffKind, DiffRecord};
use crate::error::Result;

/// Accumulates differences found during one comparison run.
///
/// A record is kept only when its message is non-empty and matches none of
/// the ignore patterns. Parse failures are never suppressed.
#[derive(Debug, Default)]
pub struct DiffRecorder {
    ignore_patterns: Vec<Regex>,
    records: Vec<DiffRecord>,
    messages: Vec<String>,
    /// Namespace pairs already reported in this run.
    namespace_pairs: FxHashSet<(String, String)>,
}

impl DiffRecorder {
    /// Creates a recorder, compiling every ignore pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let ignore_patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(DiffRecorder {
            ignore_patterns,
            ..Default::default()
        })
    }

    /// Adds a record. Returns true if it was retained.
    pub fn add_diff(&mut self, record: DiffRecord) -> bool {
        let message = record.describe();
        if message.is_empty() {
            return false;
        }
        if record.kind() != DiffKind::ParseFailure && self.is_ignored(&message) {
            tracing::trace!(%message, "difference suppressed by ignore pattern");
            return false;
        }
        self.records.push(record);
        self.messages.push(message);
        true
    }

    fn is_ignored(&self, message: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.is_match(message))
    }

    /// Returns true the first time the ordered pair `(ns1, ns2)` is seen.
    pub fn are_namespaces_new(&mut self, ns1: &str, ns2: &str) -> bool {
        self.namespace_pairs
            .insert((ns1.to_string(), ns2.to_string()))
    }

    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::record::Sample;
    use crate::error::Error;

    fn text_diff(text1: &str, text2: &str) -> DiffRecord {
        DiffRecord::TextMismatch {
            text1: text1.into(),
            text2: text2.into(),
            path: "/r".into(),
        }
    }

    #[test]
    fn test_records_in_order() {
        let mut recorder = DiffRecorder::new::<&str>(&[]).unwrap();
        assert!(recorder.is_empty());
        assert!(recorder.add_diff(text_diff("a", "b")));
        assert!(recorder.add_diff(text_diff("c", "d")));

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.records()[1].kind(), DiffKind::Text);
        assert_eq!(
            recorder.messages(),
            [
                "Node texts differ: 'a' vs 'b', path='/r'",
                "Node texts differ: 'c' vs 'd', path='/r'"
            ]
        );
    }

    #[test]
    fn test_ignore_patterns() {
        let mut recorder = DiffRecorder::new(&["'a' vs"]).unwrap();
        assert!(!recorder.add_diff(text_diff("a", "b")));
        assert!(recorder.add_diff(text_diff("c", "d")));
        assert_eq!(recorder.into_messages(), ["Node texts differ: 'c' vs 'd', path='/r'"]);
    }

    #[test]
    fn test_parse_failure_not_suppressed() {
        let mut recorder = DiffRecorder::new(&[".*"]).unwrap();
        assert!(recorder.add_diff(DiffRecord::ParseFailure {
            sample: Sample::First,
            cause: "bad".into(),
        }));
        assert_eq!(recorder.messages(), ["Can't parse the first sample: bad"]);
    }

    #[test]
    fn test_empty_message_dropped() {
        let mut recorder = DiffRecorder::default();
        let record = DiffRecord::ChildrenMismatch {
            edits: Vec::new(),
            count1: 0,
            count2: 0,
            path: "/r".into(),
        };
        assert!(!recorder.add_diff(record));
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let result = DiffRecorder::new(&["("]);
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_namespace_pairs() {
        let mut recorder = DiffRecorder::default();
        assert!(recorder.are_namespaces_new("urn:a", "urn:b"));
        assert!(!recorder.are_namespaces_new("urn:a", "urn:b"));
        assert!(recorder.are_namespaces_new("urn:b", "urn:a"));
    }
}

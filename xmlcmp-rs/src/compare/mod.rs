//! Document comparison.
//!
//! This module ties parsing, the tree comparator and the recorder together.
//! [`XmlComparator`] holds the options of a comparison; the free functions
//! are shortcuts for one-off string comparisons.

mod comparator;
mod record;
mod recorder;

pub use comparator::{TreeComparator, Verdict};
pub use record::{DiffKind, DiffRecord, Sample};
pub use recorder::DiffRecorder;

use std::path::Path;

use crate::constants::DEFAULT_MAX_VERTICES;
use crate::error::{Error, Result};
use crate::node::NodeRef;
use crate::xml::XmlParser;

/// Options of a comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Stop at the first retained difference.
    pub stop_on_first: bool,
    /// Regular expressions; a difference whose message matches any of them
    /// is dropped.
    pub ignore_patterns: Vec<String>,
    /// Cap on edit graph vertices explored per alignment.
    pub max_vertices: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            stop_on_first: false,
            ignore_patterns: Vec::new(),
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

impl CompareOptions {
    pub fn with_stop_on_first(mut self, stop_on_first: bool) -> Self {
        self.stop_on_first = stop_on_first;
        self
    }

    pub fn with_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }
}

/// Compares XML documents.
#[derive(Debug, Clone, Default)]
pub struct XmlComparator {
    options: CompareOptions,
    parser: XmlParser,
}

impl XmlComparator {
    pub fn new(options: CompareOptions) -> Self {
        XmlComparator {
            options,
            parser: XmlParser::new(),
        }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compares two documents held in strings.
    ///
    /// A sample that fails to parse yields a recorder holding a single
    /// parse failure record; the other sample is not compared.
    pub fn compare_str(&self, sample1: &str, sample2: &str) -> Result<DiffRecorder> {
        let mut recorder = DiffRecorder::new(&self.options.ignore_patterns)?;
        let Some(root1) = parsed(self.parser.parse_str(sample1), Sample::First, &mut recorder)?
        else {
            return Ok(recorder);
        };
        let Some(root2) = parsed(self.parser.parse_str(sample2), Sample::Second, &mut recorder)?
        else {
            return Ok(recorder);
        };
        self.run(&root1, &root2, recorder)
    }

    /// Compares two documents read from files.
    ///
    /// I/O errors are returned as errors; malformed content is recorded as
    /// a parse failure, as in [`compare_str`](Self::compare_str).
    pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path1: P,
        path2: Q,
    ) -> Result<DiffRecorder> {
        let mut recorder = DiffRecorder::new(&self.options.ignore_patterns)?;
        let Some(root1) = parsed(self.parser.parse_file(path1), Sample::First, &mut recorder)?
        else {
            return Ok(recorder);
        };
        let Some(root2) = parsed(self.parser.parse_file(path2), Sample::Second, &mut recorder)?
        else {
            return Ok(recorder);
        };
        self.run(&root1, &root2, recorder)
    }

    /// Compares two already parsed trees.
    pub fn compare_trees(&self, root1: &NodeRef, root2: &NodeRef) -> Result<DiffRecorder> {
        let recorder = DiffRecorder::new(&self.options.ignore_patterns)?;
        self.run(root1, root2, recorder)
    }

    fn run(
        &self,
        root1: &NodeRef,
        root2: &NodeRef,
        mut recorder: DiffRecorder,
    ) -> Result<DiffRecorder> {
        tracing::debug!(
            stop_on_first = self.options.stop_on_first,
            ignore_patterns = self.options.ignore_patterns.len(),
            "comparison started"
        );
        let verdict = TreeComparator::new(&self.options, &mut recorder).compare_nodes(root1, root2);
        tracing::debug!(?verdict, differences = recorder.len(), "comparison finished");
        Ok(recorder)
    }
}

/// Turns a parse result into a root node, or records the failure.
///
/// I/O errors are not parse failures and are propagated.
fn parsed(
    result: Result<NodeRef>,
    sample: Sample,
    recorder: &mut DiffRecorder,
) -> Result<Option<NodeRef>> {
    match result {
        Ok(root) => Ok(Some(root)),
        Err(Error::Io(e)) => Err(Error::Io(e)),
        Err(e) => {
            tracing::debug!(?sample, error = %e, "sample failed to parse");
            recorder.add_diff(DiffRecord::ParseFailure {
                sample,
                cause: e.to_string(),
            });
            Ok(None)
        }
    }
}

/// Compares two XML strings and returns the difference messages.
///
/// An empty result means the documents are equivalent.
pub fn compare(sample1: &str, sample2: &str, stop_on_first: bool) -> Vec<String> {
    match compare_with_ignore_list::<&str>(sample1, sample2, stop_on_first, &[]) {
        Ok(messages) => messages,
        Err(e) => vec![e.to_string()],
    }
}

/// Compares two XML strings, dropping messages that match any of `patterns`.
pub fn compare_with_ignore_list<S: AsRef<str>>(
    sample1: &str,
    sample2: &str,
    stop_on_first: bool,
    patterns: &[S],
) -> Result<Vec<String>> {
    compute_differences(sample1, sample2, stop_on_first, patterns).map(DiffRecorder::into_messages)
}

/// Compares two XML strings and returns the recorder with structured
/// records and messages.
pub fn compute_differences<S: AsRef<str>>(
    sample1: &str,
    sample2: &str,
    stop_on_first: bool,
    patterns: &[S],
) -> Result<DiffRecorder> {
    let options = CompareOptions::default()
        .with_stop_on_first(stop_on_first)
        .with_ignore_patterns(patterns.iter().map(|p| p.as_ref().to_string()));
    XmlComparator::new(options).compare_str(sample1, sample2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = CompareOptions::default()
            .with_stop_on_first(true)
            .with_ignore_pattern("a")
            .with_ignore_patterns(["b", "c"])
            .with_max_vertices(10);
        assert!(options.stop_on_first);
        assert_eq!(options.ignore_patterns, ["a", "b", "c"]);
        assert_eq!(options.max_vertices, 10);
        assert_eq!(CompareOptions::default().max_vertices, DEFAULT_MAX_VERTICES);
    }

    #[test]
    fn test_parse_failure_first() {
        let messages = compare("<a>", "<a/>", false);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Can't parse the first sample: "));
    }

    #[test]
    fn test_parse_failure_second() {
        let recorder = compute_differences::<&str>("<a/>", "", false, &[]).unwrap();
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.records()[0].kind(), DiffKind::ParseFailure);
        assert_eq!(
            recorder.messages()[0],
            "Can't parse the second sample: no root element found"
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let result = compare_with_ignore_list("<a/>", "<a/>", false, &["["]);
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_compare_trees() {
        let root1 = crate::xml::parse_str("<a>1</a>").unwrap();
        let root2 = crate::xml::parse_str("<a>1.0</a>").unwrap();
        let recorder = XmlComparator::default().compare_trees(&root1, &root2).unwrap();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_compare_files_io_error() {
        let result = XmlComparator::default()
            .compare_files("/nonexistent/one.xml", "/nonexistent/two.xml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

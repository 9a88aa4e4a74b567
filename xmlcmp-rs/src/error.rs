//! Error types for xml-cmp.

use thiserror::Error;

/// Result type alias for xml-cmp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or comparing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// The input contained no element.
    #[error("no root element found")]
    NoRootElement,

    /// The input ended before an element was closed.
    #[error("unclosed element: {0}")]
    UnclosedElement(String),

    /// An ignore pattern failed to compile.
    #[error("invalid ignore pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

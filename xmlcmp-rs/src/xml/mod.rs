//! XML parsing.
//!
//! Builds parent-linked, hashed node trees from markup.

mod parser;

pub use parser::{parse_file, parse_str, XmlParser};

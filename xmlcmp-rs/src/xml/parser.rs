//! XML parser that builds node trees.
//!
//! This parser uses quick-xml's streaming API. Element names and attribute
//! names are namespace-expanded while parsing, text and CDATA segments are
//! accumulated on their enclosing element, and comments, processing
//! instructions and the doctype are dropped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::node::{new_node_ref, NamespaceContext, NodeInner, NodeRef, XmlAttribute};

/// XML parser that builds hashed node trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlParser;

impl XmlParser {
    pub fn new() -> Self {
        XmlParser
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<NodeRef> {
        let mut reader = Reader::from_str(xml);
        // Keep surrounding whitespace; text is trimmed at comparison time
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<NodeRef> {
        let file = File::open(path)?;
        let buf_reader = BufReader::new(file);
        let mut reader = Reader::from_reader(buf_reader);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses the first element of a document and everything inside it.
    ///
    /// Anything before the root element other than markup is skipped, and
    /// reading stops as soon as the root element closes.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<NodeRef> {
        let mut namespaces = NamespaceContext::new();
        let mut node_stack: Vec<NodeRef> = Vec::new();
        let mut root: Option<NodeRef> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let node = self.parse_element(e, reader, &mut namespaces)?;
                    match node_stack.last() {
                        Some(parent) => NodeInner::add_child_to_ref(parent, node.clone()),
                        None => root = Some(node.clone()),
                    }
                    node_stack.push(node);
                }
                Ok(Event::Empty(ref e)) => {
                    let node = self.parse_element(e, reader, &mut namespaces)?;
                    namespaces.pop_scope();
                    match node_stack.last() {
                        Some(parent) => NodeInner::add_child_to_ref(parent, node),
                        None => {
                            root = Some(node);
                            break;
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    node_stack.pop();
                    namespaces.pop_scope();
                    if node_stack.is_empty() {
                        break;
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = node_stack.last() {
                        let raw = std::str::from_utf8(e.as_ref())
                            .map_err(|e| Error::Parse(e.to_string()))?;
                        let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                        current.borrow_mut().append_text(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(current) = node_stack.last() {
                        let text = String::from_utf8_lossy(e.as_ref());
                        current.borrow_mut().append_text(&text);
                    }
                }
                Ok(Event::Eof) => {
                    if let Some(open) = node_stack.last() {
                        let name = open.borrow().local_name().to_string();
                        return Err(Error::UnclosedElement(name));
                    }
                    break;
                }
                Ok(Event::Comment(_)) | Ok(Event::PI(_)) | Ok(Event::Decl(_)) => {}
                Ok(Event::DocType(_)) => {}
                Err(e) => return Err(Error::Xml(e)),
            }
            buf.clear();
        }

        let root = root.ok_or(Error::NoRootElement)?;
        let hash = NodeInner::compute_hashes(&root);
        tracing::debug!(
            root = %root.borrow().local_name(),
            nodes = NodeInner::count(&root),
            hash,
            "parsed document"
        );
        Ok(root)
    }

    /// Builds an element node from a start tag.
    ///
    /// Pushes a namespace scope holding the element's declarations; the
    /// caller pops it when the element closes.
    fn parse_element<R: BufRead>(
        &self,
        e: &BytesStart,
        reader: &Reader<R>,
        namespaces: &mut NamespaceContext,
    ) -> Result<NodeRef> {
        let qname = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let mut raw_attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            raw_attributes.push((key, value));
        }

        namespaces.push_scope();
        for (key, value) in &raw_attributes {
            namespaces.declare(key, value);
        }

        let mut inner = NodeInner::new(namespaces.expand_element(&qname));
        for (key, value) in raw_attributes {
            let name = namespaces.expand_attribute(&key);
            inner.push_attribute(XmlAttribute::new(name, value));
        }

        Ok(new_node_ref(inner))
    }
}

/// Parses XML from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<NodeRef> {
    XmlParser::new().parse_file(path)
}

/// Parses XML from a string.
pub fn parse_str(xml: &str) -> Result<NodeRef> {
    XmlParser::new().parse_str(xml)
}

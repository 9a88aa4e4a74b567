//! Namespace handling for element and attribute names.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::constants::{XMLNS, XML_NAMESPACE, XML_PREFIX};

/// Represents an expanded XML name (namespace URI + local name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    /// The namespace URI (empty string for no namespace). An unbound prefix
    /// is kept here verbatim.
    pub namespace_uri: Rc<str>,
    /// The local part of the name (without prefix).
    pub local_name: String,
}

impl ExpandedName {
    /// Creates a new expanded name with a namespace.
    pub fn new(uri: impl Into<Rc<str>>, local: impl Into<String>) -> Self {
        Self {
            namespace_uri: uri.into(),
            local_name: local.into(),
        }
    }

    /// Creates an expanded name with no namespace.
    pub fn no_namespace(local: impl Into<String>) -> Self {
        Self {
            namespace_uri: "".into(),
            local_name: local.into(),
        }
    }

    pub fn has_namespace(&self) -> bool {
        !self.namespace_uri.is_empty()
    }
}

impl fmt::Display for ExpandedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_namespace() {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_name)
        } else {
            f.write_str(&self.local_name)
        }
    }
}

/// Tracks namespace bindings while a document is parsed.
///
/// One scope is pushed per element; declarations on the element are bound
/// in that scope before its own name and attributes are resolved.
pub struct NamespaceContext {
    /// URI interning cache, so every node of a document shares one
    /// allocation per namespace.
    uri_cache: FxHashMap<String, Rc<str>>,
    /// Stack of scopes, each containing prefix -> URI bindings.
    scopes: Vec<FxHashMap<String, Rc<str>>>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a new namespace context with the `xml` prefix pre-bound.
    pub fn new() -> Self {
        let mut ctx = NamespaceContext {
            uri_cache: FxHashMap::default(),
            scopes: vec![FxHashMap::default()],
        };
        ctx.bind(XML_PREFIX, XML_NAMESPACE);
        ctx
    }

    /// Pushes a new scope for entering an element.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pops the current scope when leaving an element.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix to a URI in the current scope. The empty prefix is the
    /// default namespace.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        let uri_rc = self.intern_uri(uri);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri_rc);
        }
    }

    /// Binds the declaration carried by an attribute, if it is one.
    ///
    /// Returns true when `qname` declared a namespace.
    pub fn declare(&mut self, qname: &str, value: &str) -> bool {
        match split_qname(qname) {
            (None, XMLNS) => {
                self.bind("", value);
                true
            }
            (Some(XMLNS), prefix) => {
                self.bind(prefix, value);
                true
            }
            _ => false,
        }
    }

    /// Resolves a prefix to its URI, searching from innermost scope.
    pub fn resolve(&self, prefix: &str) -> Option<Rc<str>> {
        for scope in self.scopes.iter().rev() {
            if let Some(uri) = scope.get(prefix) {
                return Some(uri.clone());
            }
        }
        None
    }

    /// Returns the default namespace (empty prefix binding).
    pub fn default_namespace(&self) -> Option<Rc<str>> {
        self.resolve("")
    }

    /// Expands an element name. Unprefixed names take the default namespace.
    pub fn expand_element(&mut self, qname: &str) -> ExpandedName {
        match split_qname(qname) {
            (Some(prefix), local) => ExpandedName::new(self.resolve_or_keep(prefix), local),
            (None, local) => match self.default_namespace() {
                Some(uri) => ExpandedName::new(uri, local),
                None => ExpandedName::no_namespace(local),
            },
        }
    }

    /// Expands an attribute name.
    ///
    /// Unprefixed attributes have no namespace. Prefixed declarations
    /// (`xmlns:p`) keep `xmlns` as their namespace and `p` as local name.
    pub fn expand_attribute(&mut self, qname: &str) -> ExpandedName {
        match split_qname(qname) {
            (Some(XMLNS), local) => ExpandedName::new(self.intern_uri(XMLNS), local),
            (Some(prefix), local) => ExpandedName::new(self.resolve_or_keep(prefix), local),
            (None, local) => ExpandedName::no_namespace(local),
        }
    }

    fn resolve_or_keep(&mut self, prefix: &str) -> Rc<str> {
        match self.resolve(prefix) {
            Some(uri) => uri,
            None => self.intern_uri(prefix),
        }
    }

    /// Interns a URI string.
    pub fn intern_uri(&mut self, uri: &str) -> Rc<str> {
        if let Some(cached) = self.uri_cache.get(uri) {
            cached.clone()
        } else {
            let rc: Rc<str> = uri.into();
            self.uri_cache.insert(uri.to_string(), rc.clone());
            rc
        }
    }
}

/// Splits a qualified name into prefix and local name.
///
/// Returns (Some(prefix), local) for "prefix:local"
/// Returns (None, name) for "name" without prefix
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some(pos) = qname.find(':') {
        (Some(&qname[..pos]), &qname[pos + 1..])
    } else {
        (None, qname)
    }
}

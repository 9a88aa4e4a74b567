//! Element attributes.

use std::cmp::Ordering;
use std::fmt;

use super::namespace::ExpandedName;
use crate::constants::XMLNS;

/// An attribute of an element, in parse order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlAttribute {
    pub name: ExpandedName,
    pub value: String,
}

impl XmlAttribute {
    pub fn new(name: ExpandedName, value: impl Into<String>) -> Self {
        XmlAttribute {
            name,
            value: value.into(),
        }
    }

    /// Creates an attribute with no namespace.
    pub fn plain(local: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ExpandedName::no_namespace(local), value)
    }

    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    pub fn namespace(&self) -> &str {
        &self.name.namespace_uri
    }

    /// Orders by local name, then namespace, then value.
    ///
    /// Attributes sharing a local name across namespaces still get a
    /// position independent of document order.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.local_name()
            .cmp(other.local_name())
            .then_with(|| self.namespace().cmp(other.namespace()))
            .then_with(|| self.value.cmp(&other.value))
    }

    /// Returns true for `xmlns` and `xmlns:*` declarations.
    pub fn is_namespace_decl(&self) -> bool {
        self.namespace() == XMLNS || self.local_name() == XMLNS
    }
}

impl fmt::Display for XmlAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name.local_name, self.value)
    }
}

//! Constants used throughout the comparator.

/// Relative tolerance for numeric text comparison.
///
/// Two numbers `x` and `y` are equal when
/// `|x - y| <= NUMBER_EPSILON * (|x| + |y| + NUMBER_EPSILON)`.
pub const NUMBER_EPSILON: f64 = 1e-6;

/// Default cap on edit graph vertices explored by one alignment.
pub const DEFAULT_MAX_VERTICES: usize = 2_000_000;

/// Prefix bound to the XML namespace without declaration.
pub const XML_PREFIX: &str = "xml";

/// Namespace URI of the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Name of the default namespace declaration attribute, and the namespace
/// under which prefixed declarations (`xmlns:p`) are stored.
pub const XMLNS: &str = "xmlns";

//! Structural hashing.
//!
//! A node's own content (local name, trimmed text, non-namespace attributes)
//! is digested with MD5 and reduced to 32 bits; children's hashes are then
//! folded in document order. Equal subtrees always hash equal, and the
//! comparator treats equal hashes as identity when matching children.

use md5::{Digest, Md5};

use super::attribute::XmlAttribute;

/// Field separator fed between digest inputs, so `("ab", "c")` and
/// `("a", "bc")` do not collide.
const SEPARATOR: [u8; 1] = [0];

/// Digests the content of a single node, ignoring its children.
///
/// Attributes are digested in name order (see [`XmlAttribute::cmp_by_name`])
/// so a reordered attribute list hashes the same.
pub fn content_hash(local_name: &str, text: &str, attributes: &[XmlAttribute]) -> u32 {
    let mut hasher = Md5::new();
    hasher.update(local_name.as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(text.trim().as_bytes());

    let mut attrs: Vec<&XmlAttribute> = attributes
        .iter()
        .filter(|a| !a.is_namespace_decl())
        .collect();
    attrs.sort_by(|a, b| a.cmp_by_name(b));

    for attr in attrs {
        hasher.update(SEPARATOR);
        hasher.update(attr.local_name().as_bytes());
        hasher.update(SEPARATOR);
        hasher.update(attr.value.as_bytes());
    }

    let digest: [u8; 16] = hasher.finalize().into();
    digest_to_u32(&digest)
}

/// Folds a child's hash into its parent's.
pub fn fold_child(hash: u32, child: u32) -> u32 {
    hash.wrapping_mul(31).wrapping_add(child)
}

/// Converts the first 4 bytes of an MD5 digest to a 32-bit integer.
fn digest_to_u32(digest: &[u8; 16]) -> u32 {
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

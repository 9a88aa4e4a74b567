//! Node structures for XML tree representation.
//!
//! A parsed document is a tree of element nodes. Each node owns its children
//! and keeps a `Weak` reference to its parent, which is only used to answer
//! position and path queries. Every node memoizes a structural hash of its
//! subtree.

mod attribute;
pub mod hash;
mod namespace;

pub use attribute::XmlAttribute;
pub use namespace::{split_qname, ExpandedName, NamespaceContext};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// Creates a new node reference.
pub fn new_node_ref(inner: NodeInner) -> NodeRef {
    Rc::new(RefCell::new(inner))
}

/// The inner data of an element node.
#[derive(Debug)]
pub struct NodeInner {
    /// Expanded element name.
    name: ExpandedName,
    /// Attributes in parse order, namespace declarations included.
    attributes: Vec<XmlAttribute>,
    /// Concatenation of the node's own text and CDATA segments.
    char_data: String,
    /// Child elements.
    children: Vec<NodeRef>,
    /// Weak reference to parent node.
    parent: Weak<RefCell<NodeInner>>,
    /// Zero-based position among siblings (-1 for root).
    child_pos: i32,
    /// Memoized structural hash.
    hash: Cell<Option<u32>>,
}

impl NodeInner {
    /// Creates a detached node with no attributes, text or children.
    pub fn new(name: ExpandedName) -> Self {
        NodeInner {
            name,
            attributes: Vec::new(),
            char_data: String::new(),
            children: Vec::new(),
            parent: Weak::new(),
            child_pos: -1,
            hash: Cell::new(None),
        }
    }

    pub fn name(&self) -> &ExpandedName {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    pub fn namespace(&self) -> &str {
        &self.name.namespace_uri
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Appends an attribute.
    pub fn push_attribute(&mut self, attribute: XmlAttribute) {
        self.attributes.push(attribute);
        self.hash.set(None);
    }

    /// Returns the raw character data.
    pub fn char_data(&self) -> &str {
        &self.char_data
    }

    /// Returns the character data with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.char_data.trim()
    }

    /// Appends a text or CDATA segment.
    pub fn append_text(&mut self, text: &str) {
        self.char_data.push_str(text);
        self.hash.set(None);
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a reference to the child at the given index.
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &Weak<RefCell<NodeInner>> {
        &self.parent
    }

    /// Returns the child position (0-based index among siblings, -1 for root).
    pub fn child_pos(&self) -> i32 {
        self.child_pos
    }

    /// Returns the structural hash of this subtree.
    ///
    /// The value is memoized. Trees built by the parser are hashed right
    /// after parsing; hand-built trees are hashed on first request.
    pub fn hash(&self) -> u32 {
        match self.hash.get() {
            Some(h) => h,
            None => self.fill_hashes(false),
        }
    }

    /// Hashes this subtree children first and memoizes every value.
    ///
    /// With `force` unset, subtrees that already hold a memoized hash are
    /// left alone. Uses an explicit stack so depth is not bounded by the
    /// thread stack.
    fn fill_hashes(&self, force: bool) -> u32 {
        let mut stack: Vec<(NodeRef, bool)> = Vec::new();
        push_pending(&mut stack, &self.children, force);

        while let Some((node_ref, expanded)) = stack.pop() {
            if expanded {
                let node = node_ref.borrow();
                let h = node.fold_children();
                node.hash.set(Some(h));
            } else {
                stack.push((node_ref.clone(), true));
                push_pending(&mut stack, &node_ref.borrow().children, force);
            }
        }

        let h = self.fold_children();
        self.hash.set(Some(h));
        h
    }

    /// Own content hash folded with the memoized hashes of the children.
    fn fold_children(&self) -> u32 {
        let mut h = hash::content_hash(self.local_name(), &self.char_data, &self.attributes);
        for child in &self.children {
            h = hash::fold_child(h, child.borrow().hash());
        }
        h
    }
}

fn push_pending(stack: &mut Vec<(NodeRef, bool)>, children: &[NodeRef], force: bool) {
    for child in children.iter().rev() {
        if force || child.borrow().hash.get().is_none() {
            stack.push((child.clone(), false));
        }
    }
}

impl Drop for NodeInner {
    /// Releases the subtree without recursing once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(child) {
                let mut inner = cell.into_inner();
                pending.append(&mut inner.children);
            }
        }
    }
}

/// Helper functions that work with NodeRef.
impl NodeInner {
    /// Adds a child node. Must be called on the NodeRef wrapper.
    pub fn add_child_to_ref(parent_ref: &NodeRef, child_ref: NodeRef) {
        {
            let mut child = child_ref.borrow_mut();
            child.parent = Rc::downgrade(parent_ref);
            child.child_pos = parent_ref.borrow().children.len() as i32;
        }
        let mut parent = parent_ref.borrow_mut();
        parent.children.push(child_ref);
        parent.hash.set(None);
    }

    /// Returns the memoized structural hash of `node_ref`.
    pub fn hash_of(node_ref: &NodeRef) -> u32 {
        node_ref.borrow().hash()
    }

    /// Hashes every node of the tree in one bottom-up pass and returns the
    /// root's hash.
    pub fn compute_hashes(root: &NodeRef) -> u32 {
        root.borrow().fill_hashes(true)
    }

    /// Builds the path of a node from the document root, e.g.
    /// `/root/item[2]/name`.
    ///
    /// A level gets an `[i]` suffix when its parent has more than one child;
    /// `i` is the index of the first sibling with the same structural hash,
    /// so identical siblings share an index.
    pub fn path(node_ref: &NodeRef) -> String {
        let mut segments = Vec::new();
        let mut current = node_ref.clone();

        loop {
            let parent = current.borrow().parent.upgrade();
            let Some(parent) = parent else {
                segments.push(format!("/{}", current.borrow().local_name()));
                break;
            };

            {
                let node = current.borrow();
                let siblings = parent.borrow();
                if siblings.children.len() == 1 {
                    segments.push(format!("/{}", node.local_name()));
                } else {
                    let own = node.hash();
                    let index = siblings
                        .children
                        .iter()
                        .position(|s| Rc::ptr_eq(s, &current) || s.borrow().hash() == own)
                        .unwrap_or(node.child_pos.max(0) as usize);
                    segments.push(format!("/{}[{}]", node.local_name(), index));
                }
            }
            current = parent;
        }

        segments.reverse();
        segments.concat()
    }

    /// Visits the subtree rooted at `node_ref` depth-first, parents before
    /// children. When `visit` returns false the node's children are skipped.
    pub fn walk<F>(node_ref: &NodeRef, visit: &mut F)
    where
        F: FnMut(&NodeRef) -> bool,
    {
        let mut stack = vec![node_ref.clone()];
        while let Some(node) = stack.pop() {
            if visit(&node) {
                stack.extend(node.borrow().children.iter().rev().cloned());
            }
        }
    }

    /// Counts the nodes of a subtree.
    pub fn count(node_ref: &NodeRef) -> usize {
        let mut count = 0;
        Self::walk(node_ref, &mut |_| {
            count += 1;
            true
        });
        count
    }
}

impl fmt::Display for NodeInner {
    /// Renders `name[attr=value, ...]`, plus ` = text` for leaves.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.local_name())?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", attr)?;
        }
        f.write_str("]")?;
        if self.is_leaf() {
            write!(f, " = {}", self.char_data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str) -> NodeRef {
        new_node_ref(NodeInner::new(ExpandedName::no_namespace(name)))
    }

    fn leaf(name: &str, text: &str) -> NodeRef {
        let node = element(name);
        node.borrow_mut().append_text(text);
        node
    }

    #[test]
    fn test_add_child() {
        let parent = element("parent");
        let child1 = element("child1");
        let child2 = element("child2");

        NodeInner::add_child_to_ref(&parent, child1.clone());
        NodeInner::add_child_to_ref(&parent, child2.clone());

        assert_eq!(parent.borrow().child_count(), 2);
        assert!(Rc::ptr_eq(parent.borrow().child(1).unwrap(), &child2));
        assert!(parent.borrow().child(2).is_none());
        assert_eq!(parent.borrow().child_pos(), -1);
        assert_eq!(child1.borrow().child_pos(), 0);
        assert_eq!(child2.borrow().child_pos(), 1);

        let back = child2.borrow().parent().upgrade().unwrap();
        assert!(Rc::ptr_eq(&back, &parent));
    }

    #[test]
    fn test_text_trimmed() {
        let node = leaf("a", "  x y \n");
        assert_eq!(node.borrow().char_data(), "  x y \n");
        assert_eq!(node.borrow().text(), "x y");
    }

    #[test]
    fn test_hash_equal_for_equal_subtrees() {
        let build = || {
            let root = element("root");
            NodeInner::add_child_to_ref(&root, leaf("a", "1"));
            NodeInner::add_child_to_ref(&root, leaf("b", "2"));
            root
        };
        let one = build();
        let two = build();
        assert_eq!(NodeInner::compute_hashes(&one), NodeInner::compute_hashes(&two));
    }

    #[test]
    fn test_hash_sees_descendants() {
        let one = element("root");
        NodeInner::add_child_to_ref(&one, leaf("a", "1"));
        let two = element("root");
        NodeInner::add_child_to_ref(&two, leaf("a", "2"));
        assert_ne!(NodeInner::hash_of(&one), NodeInner::hash_of(&two));
    }

    #[test]
    fn test_hash_memoized_and_invalidated() {
        let node = leaf("a", "1");
        let before = NodeInner::hash_of(&node);
        assert_eq!(NodeInner::hash_of(&node), before);

        node.borrow_mut().append_text("0");
        assert_ne!(NodeInner::hash_of(&node), before);
    }

    #[test]
    fn test_parent_hash_served_from_memo() {
        let root = element("root");
        let child = leaf("a", "1");
        NodeInner::add_child_to_ref(&root, child.clone());
        let before = NodeInner::compute_hashes(&root);

        // Only the child's cell is cleared; the root keeps its stale value.
        child.borrow_mut().append_text("1");
        assert_eq!(NodeInner::hash_of(&root), before);
        assert_ne!(
            NodeInner::hash_of(&child),
            NodeInner::hash_of(&leaf("a", "1"))
        );
    }

    #[test]
    fn test_lazy_hash_matches_full_pass() {
        let build = || {
            let root = element("root");
            let mid = element("mid");
            NodeInner::add_child_to_ref(&mid, leaf("a", "1"));
            NodeInner::add_child_to_ref(&root, mid);
            NodeInner::add_child_to_ref(&root, leaf("b", "2"));
            root
        };
        let lazy = build();
        let full = build();
        assert_eq!(NodeInner::hash_of(&lazy), NodeInner::compute_hashes(&full));
    }

    #[test]
    fn test_deep_tree() {
        let root = element("n");
        let mut current = root.clone();
        for _ in 0..100_000 {
            let child = element("n");
            NodeInner::add_child_to_ref(&current, child.clone());
            current = child;
        }
        drop(current);

        NodeInner::compute_hashes(&root);
        assert_eq!(NodeInner::count(&root), 100_001);
        drop(root);
    }

    #[test]
    fn test_compute_hashes_refreshes_ancestors() {
        let root = element("root");
        let child = leaf("a", "1");
        NodeInner::add_child_to_ref(&root, child.clone());
        let before = NodeInner::compute_hashes(&root);

        child.borrow_mut().append_text("1");
        let after = NodeInner::compute_hashes(&root);
        assert_ne!(before, after);
        assert_eq!(NodeInner::hash_of(&root), after);
    }

    #[test]
    fn test_path() {
        let root = element("root");
        let only = element("only");
        let x = leaf("item", "x");
        let y = leaf("item", "y");
        NodeInner::add_child_to_ref(&root, only.clone());
        NodeInner::add_child_to_ref(&only, x.clone());
        NodeInner::add_child_to_ref(&only, y.clone());
        NodeInner::compute_hashes(&root);

        assert_eq!(NodeInner::path(&root), "/root");
        assert_eq!(NodeInner::path(&only), "/root/only");
        assert_eq!(NodeInner::path(&x), "/root/only/item[0]");
        assert_eq!(NodeInner::path(&y), "/root/only/item[1]");
    }

    #[test]
    fn test_path_identical_siblings_share_index() {
        let root = element("root");
        let first = leaf("item", "same");
        let second = leaf("item", "same");
        NodeInner::add_child_to_ref(&root, first);
        NodeInner::add_child_to_ref(&root, second.clone());

        assert_eq!(NodeInner::path(&second), "/root/item[0]");
    }

    #[test]
    fn test_walk_and_prune() {
        let root = element("root");
        let a = element("a");
        NodeInner::add_child_to_ref(&a, element("a1"));
        NodeInner::add_child_to_ref(&root, a);
        NodeInner::add_child_to_ref(&root, element("b"));

        let mut seen = Vec::new();
        NodeInner::walk(&root, &mut |n| {
            seen.push(n.borrow().local_name().to_string());
            true
        });
        assert_eq!(seen, ["root", "a", "a1", "b"]);

        let mut seen = Vec::new();
        NodeInner::walk(&root, &mut |n| {
            let name = n.borrow().local_name().to_string();
            let descend = name != "a";
            seen.push(name);
            descend
        });
        assert_eq!(seen, ["root", "a", "b"]);

        assert_eq!(NodeInner::count(&root), 4);
    }

    #[test]
    fn test_display() {
        let node = leaf("a", "text");
        node.borrow_mut().push_attribute(XmlAttribute::plain("x", "1"));
        node.borrow_mut().push_attribute(XmlAttribute::plain("y", "2"));
        assert_eq!(node.borrow().to_string(), "a[x=1, y=2] = text");

        let parent = element("p");
        NodeInner::add_child_to_ref(&parent, node);
        assert_eq!(parent.borrow().to_string(), "p[]");
    }
}

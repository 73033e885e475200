use super::handle::Handle;

/// A single AVL node.
///
/// `height` is the length in nodes of the longest path to a descendant leaf
/// (a leaf has height 1), and `weight` is the number of nodes in the subtree
/// rooted here (a leaf has weight 1). Both are maintained bottom-up by the
/// tree's mutation protocol; an empty subtree contributes 0 to each.
#[derive(Clone)]
pub(crate) struct Node {
    key: i64,
    // The AVL balance invariant caps the height of a Handle::MAX-node tree
    // well below u8::MAX.
    height: u8,
    weight: usize,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl Node {
    /// Creates a new leaf node holding `key`.
    pub(crate) const fn new_leaf(key: i64) -> Self {
        Self {
            key,
            height: 1,
            weight: 1,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> i64 {
        self.key
    }

    /// Borrowed form of the key, for rank indexing which must hand out a
    /// reference into the tree.
    #[inline]
    pub(crate) const fn key_ref(&self) -> &i64 {
        &self.key
    }

    /// Overwrites the key in place, leaving the tree structure untouched.
    /// Used by the two-child removal protocol to promote a predecessor key.
    pub(crate) const fn set_key(&mut self, key: i64) {
        self.key = key;
    }

    #[inline]
    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) const fn weight(&self) -> usize {
        self.weight
    }

    /// Recomputes height and weight from the children's already-current
    /// bookkeeping values.
    pub(crate) const fn set_bookkeeping(&mut self, height: u8, weight: usize) {
        self.height = height;
        self.weight = weight;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    pub(crate) const fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) const fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Returns the node's single child slot for the ≤1-child removal case.
    ///
    /// # Panics
    ///
    /// Panics if the node has two children.
    pub(crate) fn lone_child(&self) -> Option<Handle> {
        match (self.left, self.right) {
            (None, child) | (child, None) => child,
            (Some(_), Some(_)) => panic!("`Node::lone_child()` - node has two children!"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_bookkeeping() {
        let node = Node::new_leaf(42);
        assert_eq!(node.key(), 42);
        assert_eq!(node.height(), 1);
        assert_eq!(node.weight(), 1);
        assert!(node.left().is_none());
        assert!(node.right().is_none());
    }

    #[test]
    fn lone_child_prefers_whichever_is_present() {
        let mut node = Node::new_leaf(0);
        assert_eq!(node.lone_child(), None);

        let child = Handle::from_index(7);
        node.set_right(Some(child));
        assert_eq!(node.lone_child(), Some(child));

        node.set_right(None);
        node.set_left(Some(child));
        assert_eq!(node.lone_child(), Some(child));
    }

    #[test]
    #[should_panic(expected = "`Node::lone_child()` - node has two children!")]
    fn lone_child_with_two_children_panics() {
        let mut node = Node::new_leaf(0);
        node.set_left(Some(Handle::from_index(1)));
        node.set_right(Some(Handle::from_index(2)));
        let _ = node.lone_child();
    }
}

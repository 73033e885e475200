use core::cmp::Ordering;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;
use crate::order_statistic::RankOutOfRange;

/// Traversal stacks hold at most one node per tree level, so the inline
/// capacity covers trees of tens of thousands of keys before spilling.
type TraversalStack = SmallVec<[Handle; 16]>;

/// The core AVL engine backing `OSAvlTree`.
///
/// Nodes live in a slot-map arena and refer to their children by handle;
/// each child slot is owned by exactly one parent (or the root slot), so
/// structural edits are handle reassignments. All mutation is recursive:
/// descend by the ordering rule, edit, then recompute each node's height and
/// weight bottom-up on the unwind *before* rebalancing it, because the
/// rebalancing decisions read the children's heights.
#[derive(Clone)]
pub(crate) struct RawAvlTree {
    nodes: Arena<Node>,
    root: Option<Handle>,
}

impl RawAvlTree {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with slots preallocated for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the number of keys in the tree: the root's weight.
    pub(crate) fn len(&self) -> usize {
        self.weight_of(self.root)
    }

    /// Returns true if the tree contains no keys.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree: the root's height, 0 when empty.
    pub(crate) fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    /// Clears all keys from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns true if `key` is present.
    ///
    /// The descent follows the ordering rule alone, with no equality test
    /// inside the loop. Every right turn passes a node whose key is `<=`
    /// `key`, and those keys are non-decreasing along the path, so the last
    /// right turn lands on the floor of `key`; one comparison at the end
    /// settles membership.
    pub(crate) fn contains(&self, key: i64) -> bool {
        let mut current = self.root;
        let mut floor = None;

        while let Some(h) = current {
            let node = self.nodes.get(h);
            if key < node.key() {
                current = node.left();
            } else {
                floor = Some(h);
                current = node.right();
            }
        }

        floor.is_some_and(|h| self.nodes.get(h).key() == key)
    }

    /// Inserts `key`, keeping duplicates. Exactly one node is allocated.
    pub(crate) fn insert(&mut self, key: i64) {
        let root = self.insert_at(self.root, key);
        self.root = Some(root);
    }

    /// Recursive insertion into the subtree at `slot`; returns the subtree's
    /// (possibly new) root handle.
    fn insert_at(&mut self, slot: Option<Handle>, key: i64) -> Handle {
        let Some(h) = slot else {
            // Empty slot: the new key becomes a leaf here.
            return self.nodes.alloc(Node::new_leaf(key));
        };

        // Ties descend right, matching the ordering invariant.
        if key < self.nodes.get(h).key() {
            let left = self.insert_at(self.nodes.get(h).left(), key);
            self.nodes.get_mut(h).set_left(Some(left));
        } else {
            let right = self.insert_at(self.nodes.get(h).right(), key);
            self.nodes.get_mut(h).set_right(Some(right));
        }

        self.update_bookkeeping(h);
        self.rebalance(h)
    }

    /// Removes one occurrence of `key`. A missing key (or an empty tree) is
    /// not an error; the tree is simply left unchanged.
    pub(crate) fn remove(&mut self, key: i64) {
        self.root = self.remove_at(self.root, key);
    }

    /// Recursive removal from the subtree at `slot`; returns the subtree's
    /// new root slot.
    fn remove_at(&mut self, slot: Option<Handle>, key: i64) -> Option<Handle> {
        let h = slot?;

        match key.cmp(&self.nodes.get(h).key()) {
            Ordering::Less => {
                let left = self.remove_at(self.nodes.get(h).left(), key);
                self.nodes.get_mut(h).set_left(left);
            }
            Ordering::Greater => {
                let right = self.remove_at(self.nodes.get(h).right(), key);
                self.nodes.get_mut(h).set_right(right);
            }
            Ordering::Equal => match (self.nodes.get(h).left(), self.nodes.get(h).right()) {
                (Some(left), Some(_)) => {
                    // Two children: promote the in-order predecessor's key
                    // (the rightmost key of the left subtree) into this node,
                    // then remove that key from the left subtree. The
                    // recursion bottoms out at a node with at most one child
                    // without a second predecessor search.
                    let predecessor = self.rightmost_key(left);
                    self.nodes.get_mut(h).set_key(predecessor);
                    let left = self.remove_at(Some(left), predecessor);
                    self.nodes.get_mut(h).set_left(left);
                }
                _ => {
                    // Zero or one child: splice the child into this slot.
                    // This is the only place a node is ever released.
                    return self.nodes.take(h).lone_child();
                }
            },
        }

        self.update_bookkeeping(h);
        Some(self.rebalance(h))
    }

    /// Returns the largest key in the subtree rooted at `h`: the in-order
    /// predecessor used by two-child removal.
    fn rightmost_key(&self, mut h: Handle) -> i64 {
        while let Some(right) = self.nodes.get(h).right() {
            h = right;
        }
        self.nodes.get(h).key()
    }

    /// Returns the key at the zero-based `rank` in sorted order, descending
    /// by subtree weights instead of traversing.
    ///
    /// # Panics
    ///
    /// Panics if the descent runs off the tree with a rank already validated
    /// against `len()`; that can only mean stale subtree weights.
    pub(crate) fn select(&self, rank: usize) -> Result<&i64, RankOutOfRange> {
        if rank >= self.len() {
            return Err(RankOutOfRange { rank, len: self.len() });
        }

        let mut current = self.root;
        let mut remaining = rank;

        loop {
            let Some(h) = current else {
                panic!("`RawAvlTree::select()` - subtree weights are inconsistent!");
            };
            let node = self.nodes.get(h);
            let left_weight = self.weight_of(node.left());

            match remaining.cmp(&left_weight) {
                // This node is preceded by exactly `remaining` keys.
                Ordering::Equal => return Ok(node.key_ref()),
                Ordering::Less => current = node.left(),
                Ordering::Greater => {
                    // Skip the left subtree and this node.
                    remaining -= left_weight + 1;
                    current = node.right();
                }
            }
        }
    }

    /// Returns an in-order (non-decreasing key) iterator.
    pub(crate) fn iter(&self) -> Iter<'_> {
        let mut stack = TraversalStack::new();
        push_left_spine(self, &mut stack, self.root);
        Iter {
            tree: self,
            stack,
            remaining: self.len(),
        }
    }

    /// Returns a pre-order (root before subtrees) iterator.
    pub(crate) fn pre_order(&self) -> PreOrder<'_> {
        let mut stack = TraversalStack::new();
        if let Some(root) = self.root {
            stack.push(root);
        }
        PreOrder {
            tree: self,
            stack,
            remaining: self.len(),
        }
    }

    /// Re-derives every node's ordering bounds, balance, height, and weight
    /// from scratch, panicking on any disagreement with the stored values.
    pub(crate) fn assert_invariants(&self) {
        let (height, weight) = self.check_subtree(self.root, None, None);
        assert_eq!(usize::from(height), self.height(), "`assert_invariants()` - tree height is stale!");
        assert_eq!(weight, self.len(), "`assert_invariants()` - tree weight is stale!");
    }

    /// Checks the subtree at `slot` against the inclusive key bounds
    /// `[low, high]` and returns its recomputed `(height, weight)`.
    fn check_subtree(&self, slot: Option<Handle>, low: Option<i64>, high: Option<i64>) -> (u8, usize) {
        let Some(h) = slot else {
            return (0, 0);
        };
        let node = self.nodes.get(h);
        let key = node.key();

        // Duplicates start out to the right of their twin, but rotations and
        // predecessor promotion can carry an equal key into a left subtree,
        // so the in-order sequence is validated as non-decreasing.
        assert!(low.is_none_or(|low| key >= low), "`assert_invariants()` - key {key} violates BST ordering!");
        assert!(high.is_none_or(|high| key <= high), "`assert_invariants()` - key {key} violates BST ordering!");

        let (left_height, left_weight) = self.check_subtree(node.left(), low, Some(key));
        let (right_height, right_weight) = self.check_subtree(node.right(), Some(key), high);

        let balance = i32::from(left_height) - i32::from(right_height);
        assert!(balance.abs() <= 1, "`assert_invariants()` - node {key} has balance {balance}!");
        assert_eq!(
            node.height(),
            1 + left_height.max(right_height),
            "`assert_invariants()` - node {key} has a stale height!"
        );
        assert_eq!(
            node.weight(),
            1 + left_weight + right_weight,
            "`assert_invariants()` - node {key} has a stale weight!"
        );

        (node.height(), node.weight())
    }

    /// Height of an optional subtree; an empty slot has height 0.
    fn height_of(&self, slot: Option<Handle>) -> u8 {
        slot.map_or(0, |h| self.nodes.get(h).height())
    }

    /// Weight of an optional subtree; an empty slot has weight 0.
    fn weight_of(&self, slot: Option<Handle>) -> usize {
        slot.map_or(0, |h| self.nodes.get(h).weight())
    }

    /// Balance factor of an optional subtree: left height minus right height.
    fn balance_of(&self, slot: Option<Handle>) -> i32 {
        slot.map_or(0, |h| {
            let node = self.nodes.get(h);
            i32::from(self.height_of(node.left())) - i32::from(self.height_of(node.right()))
        })
    }

    /// Recomputes `h`'s height and weight from its children, which must
    /// already be current.
    fn update_bookkeeping(&mut self, h: Handle) {
        let (left, right) = {
            let node = self.nodes.get(h);
            (node.left(), node.right())
        };
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let weight = 1 + self.weight_of(left) + self.weight_of(right);
        self.nodes.get_mut(h).set_bookkeeping(height, weight);
    }

    /// Restores the balance invariant at `h` after a single insert or
    /// removal, returning the subtree's new root handle.
    ///
    /// # Panics
    ///
    /// Panics if the balance factor falls outside `[-2, 2]`; single-key
    /// mutations can never cause that, so it signals stale bookkeeping.
    fn rebalance(&mut self, h: Handle) -> Handle {
        let balance = self.balance_of(Some(h));
        assert!(
            (-2..=2).contains(&balance),
            "`RawAvlTree::rebalance()` - balance {balance} is outside [-2, 2]!"
        );

        if balance == 2 {
            // Left side outweighs the right. A right-heavy left child forms
            // a zigzag; straighten it first, then fold the line in half.
            let left = self.nodes.get(h).left();
            if self.balance_of(left) == -1 {
                let straightened =
                    self.rotate_left(left.expect("`RawAvlTree::rebalance()` - left-heavy node has no left child!"));
                self.nodes.get_mut(h).set_left(Some(straightened));
            }
            self.rotate_right(h)
        } else if balance == -2 {
            // Right side outweighs the left: the mirror image.
            let right = self.nodes.get(h).right();
            if self.balance_of(right) == 1 {
                let straightened = self
                    .rotate_right(right.expect("`RawAvlTree::rebalance()` - right-heavy node has no right child!"));
                self.nodes.get_mut(h).set_right(Some(straightened));
            }
            self.rotate_left(h)
        } else {
            h
        }
    }

    /// Rotates the edge between `h` and its right child to the left and
    /// returns the new subtree root (the old right child).
    fn rotate_left(&mut self, h: Handle) -> Handle {
        let pivot = self.nodes.get(h).right().expect("`RawAvlTree::rotate_left()` - node has no right child!");

        // The pivot's left subtree moves under the demoted node.
        let transfer = self.nodes.get(pivot).left();
        self.nodes.get_mut(h).set_right(transfer);
        self.nodes.get_mut(pivot).set_left(Some(h));

        // Demoted node first; the new root's bookkeeping reads it.
        self.update_bookkeeping(h);
        self.update_bookkeeping(pivot);
        pivot
    }

    /// Rotates the edge between `h` and its left child to the right: the
    /// mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, h: Handle) -> Handle {
        let pivot = self.nodes.get(h).left().expect("`RawAvlTree::rotate_right()` - node has no left child!");

        let transfer = self.nodes.get(pivot).right();
        self.nodes.get_mut(h).set_left(transfer);
        self.nodes.get_mut(pivot).set_right(Some(h));

        self.update_bookkeeping(h);
        self.update_bookkeeping(pivot);
        pivot
    }
}

/// Pushes `slot` and its chain of left children, so the stack top is the
/// smallest not-yet-yielded key.
fn push_left_spine(tree: &RawAvlTree, stack: &mut TraversalStack, mut slot: Option<Handle>) {
    while let Some(h) = slot {
        stack.push(h);
        slot = tree.nodes.get(h).left();
    }
}

/// An in-order iterator over the tree's keys.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(crate) struct Iter<'a> {
    tree: &'a RawAvlTree,
    stack: TraversalStack,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let h = self.stack.pop()?;
        let node = self.tree.nodes.get(h);
        push_left_spine(self.tree, &mut self.stack, node.right());
        self.remaining -= 1;
        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// A pre-order iterator over the tree's keys.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(crate) struct PreOrder<'a> {
    tree: &'a RawAvlTree,
    stack: TraversalStack,
    remaining: usize,
}

impl Iterator for PreOrder<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let h = self.stack.pop()?;
        let node = self.tree.nodes.get(h);
        // Right below left, so the left subtree is yielded first.
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        self.remaining -= 1;
        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PreOrder<'_> {}
impl FusedIterator for PreOrder<'_> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    fn tree_of(keys: &[i64]) -> RawAvlTree {
        let mut tree = RawAvlTree::new();
        for &key in keys {
            tree.insert(key);
            tree.assert_invariants();
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree = RawAvlTree::new();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
        assert!(!tree.contains(0));
        assert_eq!(tree.select(0), Err(RankOutOfRange { rank: 0, len: 0 }));
        tree.assert_invariants();
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        // A degenerate chain would have height 7; left rotations must keep
        // this at the perfect height of 3.
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.pre_order().collect::<Vec<_>>(), [4, 2, 1, 3, 6, 5, 7]);
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let tree = tree_of(&[7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn zigzag_inserts_stay_balanced() {
        // Left-right and right-left shapes exercise the double rotations.
        let lr = tree_of(&[3, 1, 2]);
        assert_eq!(lr.height(), 2);
        assert_eq!(lr.pre_order().collect::<Vec<_>>(), [2, 1, 3]);

        let rl = tree_of(&[1, 3, 2]);
        assert_eq!(rl.height(), 2);
        assert_eq!(rl.pre_order().collect::<Vec<_>>(), [2, 1, 3]);
    }

    #[test]
    fn contains_compares_the_floor_once() {
        // Searching 5 turns right at the root and then left at 8; the floor
        // recorded at the right turn is what makes the lookup succeed.
        let tree = tree_of(&[5, 3, 8]);
        assert!(tree.contains(5));
        assert!(tree.contains(3));
        assert!(tree.contains(8));
        assert!(!tree.contains(4));
        assert!(!tree.contains(6));
        assert!(!tree.contains(9));
        assert!(!tree.contains(i64::MIN));
    }

    #[test]
    fn remove_leaf_and_single_child() {
        let mut tree = tree_of(&[5, 3, 8, 1]);
        tree.remove(8); // leaf
        tree.assert_invariants();
        tree.remove(3); // one child (1)
        tree.assert_invariants();
        assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 5]);
    }

    #[test]
    fn remove_two_children_promotes_predecessor() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        tree.remove(5);
        tree.assert_invariants();
        // 4, the rightmost key of the old left subtree, takes the root slot.
        assert_eq!(tree.pre_order().next(), Some(4));
        assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn remove_missing_key_is_a_no_op() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.remove(42);
        tree.assert_invariants();
        assert_eq!(tree.len(), 3);

        let mut empty = RawAvlTree::new();
        empty.remove(42);
        assert!(empty.is_empty());
    }

    #[test]
    fn remove_with_duplicates_takes_one_occurrence() {
        let mut tree = tree_of(&[3, 3, 3, 1, 5]);
        tree.remove(3);
        tree.assert_invariants();
        assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 3, 3, 5]);
        assert!(tree.contains(3));

        tree.remove(3);
        tree.remove(3);
        tree.assert_invariants();
        assert!(!tree.contains(3));
        assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 5]);
    }

    #[test]
    fn duplicates_rotated_leftward_keep_invariants() {
        // Three equal keys chain to the right and rotate, leaving a 3 in the
        // root's left subtree; the checker must accept that shape.
        let tree = tree_of(&[3, 3, 3]);
        assert_eq!(tree.pre_order().collect::<Vec<_>>(), [3, 3, 3]);
        assert_eq!(tree.height(), 2);
        tree.assert_invariants();

        // Predecessor promotion can do the same: removing 5 promotes the
        // duplicate 3, so an equal key sits below the new root on the left.
        let mut tree = tree_of(&[5, 3, 8, 3, 1]);
        tree.remove(5);
        tree.assert_invariants();
        assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 3, 3, 8]);
    }

    #[test]
    fn select_matches_in_order() {
        let tree = tree_of(&[5, 3, 8, 3, 1]);
        let in_order: Vec<_> = tree.iter().collect();
        assert_eq!(in_order, [1, 3, 3, 5, 8]);
        for (rank, &key) in in_order.iter().enumerate() {
            assert_eq!(tree.select(rank).copied(), Ok(key));
        }
        assert_eq!(tree.select(5), Err(RankOutOfRange { rank: 5, len: 5 }));
    }

    proptest! {
        /// Random insert/remove sequences keep every invariant intact and
        /// agree with a sorted-vector model of the multiset.
        #[test]
        fn ops_match_sorted_model(ops in prop::collection::vec((any::<bool>(), -50i64..50), 0..400)) {
            let mut tree = RawAvlTree::new();
            let mut model: Vec<i64> = Vec::new();

            for (is_insert, key) in ops {
                if is_insert {
                    tree.insert(key);
                    let at = model.partition_point(|&k| k <= key);
                    model.insert(at, key);
                } else {
                    tree.remove(key);
                    if let Ok(at) = model.binary_search(&key) {
                        model.remove(at);
                    }
                }

                tree.assert_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.contains(key), model.binary_search(&key).is_ok());
            }

            let in_order: Vec<_> = tree.iter().collect();
            prop_assert_eq!(&in_order, &model);

            for (rank, &key) in model.iter().enumerate() {
                prop_assert_eq!(tree.select(rank).copied(), Ok(key));
            }
        }

        /// The AVL height bound holds for trees built from random keys.
        #[test]
        fn height_is_logarithmic(keys in prop::collection::vec(any::<i64>(), 1..600)) {
            let mut tree = RawAvlTree::new();
            for &key in &keys {
                tree.insert(key);
            }
            tree.assert_invariants();

            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bound = (1.44 * ((tree.len() + 2) as f64).log2()).floor() as usize;
            prop_assert!(tree.height() <= bound, "height {} exceeds AVL bound {}", tree.height(), bound);
        }
    }
}

//! An ordered multiset of `i64` keys with O(log n) order-statistic queries.

use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{self, RawAvlTree};

mod capacity;
mod order_statistic;

/// An ordered multiset of `i64` keys based on an AVL tree augmented with
/// subtree weights.
///
/// Every node tracks the height and the key count (*weight*) of its subtree;
/// the insertion and removal protocols keep both current while rebalancing,
/// which is what makes rank queries such as
/// [`rank_select`](OSAvlTree::rank_select) logarithmic.
///
/// Unlike `std::collections::BTreeSet`, equal keys are kept: inserting a key
/// twice stores two nodes, both visible to iteration and rank queries, and
/// [`remove`](OSAvlTree::remove) takes out one occurrence at a time.
///
/// # Examples
///
/// ```
/// use osavl_tree::OSAvlTree;
///
/// let mut heights = OSAvlTree::new();
///
/// heights.insert(180);
/// heights.insert(165);
/// heights.insert(172);
/// heights.insert(172);
///
/// // The median of an odd-length multiset is the middle rank.
/// assert_eq!(heights.rank_select(heights.len() / 2), Ok(172));
///
/// heights.remove(172);
/// assert_eq!(heights.iter().collect::<Vec<_>>(), [165, 172, 180]);
/// ```
#[derive(Clone)]
pub struct OSAvlTree {
    raw: RawAvlTree,
}

impl OSAvlTree {
    /// Creates an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawAvlTree::new() }
    }

    /// Returns the number of keys in the tree, counting duplicates.
    ///
    /// This is an O(1) read of the root's weight.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// assert!(tree.is_empty());
    /// tree.insert(1);
    /// assert!(!tree.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: the longest path from the root to a
    /// leaf, in nodes. An empty tree has height 0 and a single key has
    /// height 1. The balance invariant keeps this within roughly
    /// `1.44 * log2(len)`.
    ///
    /// This is an O(1) read of the root's height.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree = (1..=7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Clears the tree, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree: OSAvlTree = [1, 2, 3].into_iter().collect();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns `true` if the tree contains `key`.
    ///
    /// The descent never tests for equality mid-loop; it follows the
    /// ordering rule to the bottom and compares the floor candidate once.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree = [5, 3, 8].into_iter().collect();
    /// assert!(tree.contains(5));
    /// assert!(!tree.contains(4));
    /// ```
    #[must_use]
    pub fn contains(&self, key: i64) -> bool {
        self.raw.contains(key)
    }

    /// Inserts `key` into the tree.
    ///
    /// Duplicates are kept: inserting a key that is already present adds a
    /// second occurrence rather than replacing the first.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree = OSAvlTree::new();
    /// tree.insert(3);
    /// tree.insert(3);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, key: i64) {
        self.raw.insert(key);
    }

    /// Removes one occurrence of `key` from the tree.
    ///
    /// Removing a key that is not present (or removing from an empty tree)
    /// is not an error; the tree is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let mut tree: OSAvlTree = [3, 3, 5].into_iter().collect();
    /// tree.remove(3);
    /// tree.remove(42); // no-op
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 5]);
    /// ```
    pub fn remove(&mut self, key: i64) {
        self.raw.remove(key);
    }

    /// Returns an iterator over the keys in non-decreasing order.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree = [5, 1, 3].into_iter().collect();
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [1, 3, 5]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.raw.iter() }
    }

    /// Returns an iterator over the keys in pre-order: each node's key
    /// before the keys of its subtrees, left subtree first. Useful for
    /// inspecting the tree's shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree: OSAvlTree = (1..=7).collect();
    /// assert_eq!(tree.pre_order().collect::<Vec<_>>(), [4, 2, 1, 3, 6, 5, 7]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { inner: self.raw.pre_order() }
    }

    /// Recomputes every node's ordering bounds, balance factor, height, and
    /// weight from the structure alone and checks them against the stored
    /// bookkeeping.
    ///
    /// # Panics
    ///
    /// Panics if any invariant does not hold. That indicates a bug in this
    /// crate, not in the caller.
    pub fn assert_invariants(&self) {
        self.raw.assert_invariants();
    }
}

impl Default for OSAvlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OSAvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl PartialEq for OSAvlTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for OSAvlTree {}

impl FromIterator<i64> for OSAvlTree {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut tree = OSAvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<i64> for OSAvlTree {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<const N: usize> From<[i64; N]> for OSAvlTree {
    /// Converts a `[i64; N]` into an `OSAvlTree`, keeping duplicates.
    ///
    /// ```
    /// use osavl_tree::OSAvlTree;
    ///
    /// let tree = OSAvlTree::from([3, 1, 2, 3]);
    /// assert_eq!(tree.len(), 4);
    /// ```
    fn from(keys: [i64; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a OSAvlTree {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// An in-order iterator over the keys of an `OSAvlTree`.
///
/// This `struct` is created by the [`iter`](OSAvlTree::iter) method. See its
/// documentation for more.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a> {
    inner: raw::Iter<'a>,
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// A pre-order iterator over the keys of an `OSAvlTree`.
///
/// This `struct` is created by the [`pre_order`](OSAvlTree::pre_order)
/// method. See its documentation for more.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PreOrder<'a> {
    inner: raw::PreOrder<'a>,
}

impl Iterator for PreOrder<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PreOrder<'_> {}
impl FusedIterator for PreOrder<'_> {}

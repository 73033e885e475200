use core::ops::Index;

use super::OSAvlTree;
use crate::{Rank, RankOutOfRange};

impl OSAvlTree {
    /// Returns the key at position `rank` (zero-based) in sorted order,
    /// descending by subtree weights rather than traversing.
    ///
    /// Duplicates occupy consecutive ranks. An out-of-range rank yields
    /// [`RankOutOfRange`] rather than a sentinel key, so the error can never
    /// be mistaken for a stored key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::{OSAvlTree, RankOutOfRange};
    ///
    /// let tree: OSAvlTree = [5, 3, 8, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.rank_select(0), Ok(3));
    /// assert_eq!(tree.rank_select(1), Ok(3));
    /// assert_eq!(tree.rank_select(3), Ok(8));
    /// assert_eq!(tree.rank_select(4), Err(RankOutOfRange { rank: 4, len: 4 }));
    /// ```
    pub fn rank_select(&self, rank: usize) -> Result<i64, RankOutOfRange> {
        self.raw.select(rank).copied()
    }
}

/// Indexes into the tree by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, Rank};
///
/// let tree: OSAvlTree = [2, 1, 3].into_iter().collect();
///
/// assert_eq!(tree[Rank(0)], 1);
/// assert_eq!(tree[Rank(2)], 3);
/// ```
impl Index<Rank> for OSAvlTree {
    type Output = i64;

    fn index(&self, rank: Rank) -> &i64 {
        match self.raw.select(rank.0) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }
}

use core::error::Error;
use core::fmt;

/// A zero-based rank into the sorted order of the tree's keys.
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, Rank};
///
/// let tree: OSAvlTree = [10, 20].into_iter().collect();
///
/// assert_eq!(tree[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

/// The error returned by [`rank_select`](crate::OSAvlTree::rank_select) when
/// the requested rank is not in `0..len()`.
///
/// Carrying the offending rank and the tree length keeps the failure
/// unambiguous; a sentinel key could collide with a legitimately stored key.
///
/// # Examples
///
/// ```
/// use osavl_tree::{OSAvlTree, RankOutOfRange};
///
/// let tree: OSAvlTree = [1, 2].into_iter().collect();
///
/// assert_eq!(tree.rank_select(2), Err(RankOutOfRange { rank: 2, len: 2 }));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RankOutOfRange {
    /// The rank that was requested.
    pub rank: usize,
    /// The number of keys in the tree at the time of the request.
    pub len: usize,
}

impl fmt::Display for RankOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rank {} is out of range for a tree of {} keys", self.rank, self.len)
    }
}

impl Error for RankOutOfRange {}

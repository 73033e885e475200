//! An order-statistic AVL tree for Rust.
//!
//! This crate provides [`OSAvlTree`], a multiset of `i64` keys backed by a
//! height-balanced (AVL) binary search tree augmented with subtree weights.
//! On top of the usual O(log n) insert/remove/contains it supports O(log n)
//! order-statistic queries:
//!
//! - [`rank_select`](OSAvlTree::rank_select) - Get the key at a given sorted position
//! - Indexing by [`Rank`] - e.g., `tree[Rank(0)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use osavl_tree::{OSAvlTree, Rank};
//!
//! let mut tree = OSAvlTree::new();
//! tree.insert(5);
//! tree.insert(3);
//! tree.insert(8);
//! tree.insert(3); // duplicates are kept
//!
//! assert!(tree.contains(8));
//! assert_eq!(tree.len(), 4);
//!
//! // Order-statistic operations (O(log n))
//! assert_eq!(tree.rank_select(0), Ok(3));
//! assert_eq!(tree.rank_select(2), Ok(5));
//! assert_eq!(tree[Rank(3)], 8);
//!
//! tree.remove(3); // removes one occurrence
//! assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 5, 8]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Duplicate keys** - Equal keys are kept and counted in rank space
//! - **O(log n) rank operations** - Order-statistic queries via subtree weight augmentation
//! - **Explicit errors** - Out-of-range ranks yield [`RankOutOfRange`], never a sentinel key
//!
//! # Implementation
//!
//! The tree is an AVL tree: every node stores its subtree height and the
//! rebalancing pass keeps sibling heights within one of each other, bounding
//! the height by roughly `1.44 * log2(n)`. Each node additionally tracks the
//! number of keys in its subtree (its *weight*), which is what makes
//! rank-based access logarithmic instead of a full traversal. Nodes live in
//! a contiguous arena and refer to their children by handle, so the
//! structure is free of raw pointers.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod osavl_tree;

pub use order_statistic::{Rank, RankOutOfRange};
pub use osavl_tree::OSAvlTree;

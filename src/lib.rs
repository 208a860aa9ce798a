//! This crate exposes an order-statistic Binary Search Tree (BST) that can
//! optionally balance itself as an AVL tree.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key (the value
//! used for ordering), an opaque payload, and up to two child `Node`s. The most
//! important invariant of a BST is that an in-order walk (left subtree, then
//! the node, then the right subtree) visits the keys in ascending order.
//!
//! Searching for a key takes `O(height)` where `height` is the longest path
//! from the root `Node` to a leaf `Node`. In [`Mode::Avl`] every insert and
//! delete restores the AVL invariant (the heights of the two subtrees of any
//! node differ by at most one) which keeps the height at `O(lg N)`.
//!
//! ## Order statistics
//!
//! Every `Node` also tracks the size of the subtree rooted at it. That is
//! enough to answer "what is the `i`-th smallest key?" ([`Tree::select`]) and
//! "at which position is this node?" ([`Tree::rank`]) in `O(height)`.
//!
//! ## Duplicate keys
//!
//! With [`Duplicates::Allow`] a key may be inserted more than once. Equal keys
//! are chained down the left side of the first node found with that key, so an
//! in-order walk shows them next to each other.
//!
//! # Examples
//!
//! ```
//! use rank_tree::{Duplicates, Tree};
//!
//! let mut tree = Tree::new();
//! for key in [5, 1, 11, 4, 2] {
//!     tree.insert(key, (), Duplicates::Reject).unwrap();
//! }
//!
//! let third = tree.select(3).unwrap();
//! assert_eq!(tree.key(third), Some(&4));
//! assert_eq!(tree.rank(third), Some(3));
//!
//! let keys: Vec<_> = tree.keys().copied().collect();
//! assert_eq!(keys, [1, 2, 4, 5, 11]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
mod balance;
mod delete;
mod error;
mod insert;
mod iter;
mod node;
mod rank;
mod tree;


pub use balance::Rebalance;
pub use error::TreeError;
pub use iter::InOrder;
pub use node::{Node, NodeId};
pub use tree::{Duplicates, Mode, Search, Tree};

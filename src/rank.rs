//! Order statistics on top of the cached subtree sizes.

use std::cmp::Ordering;

use log::debug;

use crate::error::TreeError;
use crate::node::NodeId;
use crate::tree::Tree;

impl<K, V> Tree<K, V> {
    /// The 1-indexed position of the node in key order, `None` if the node is
    /// not part of the tree.
    ///
    /// Everything in the left subtree precedes the node. On the way up, every
    /// ancestor reached from its right child precedes it too, along with that
    /// ancestor's left subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree};
    ///
    /// let mut tree = Tree::plain();
    /// let ids: Vec<_> = [1, 2, 3]
    ///     .into_iter()
    ///     .map(|k| tree.insert(k, (), Duplicates::Reject).unwrap())
    ///     .collect();
    ///
    /// // A right-leaning chain: every ancestor of 3 counts.
    /// assert_eq!(tree.rank(ids[2]), Some(3));
    /// ```
    pub fn rank(&self, id: NodeId) -> Option<usize> {
        if !self.is_linked(id) {
            return None;
        }
        let node = &self.arena[id];
        let mut rank = self.arena.size_of(node.left) + 1;

        let mut child = id;
        let mut cursor = node.parent;
        while let Some(parent) = cursor {
            let node = &self.arena[parent];
            if node.right == Some(child) {
                rank += self.arena.size_of(node.left) + 1;
            }
            child = parent;
            cursor = node.parent;
        }
        Some(rank)
    }

    /// The node holding the `i`-th smallest key (1-indexed) of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    /// for key in [5, 1, 4, 2, 11] {
    ///     tree.insert(key, (), Duplicates::Reject).unwrap();
    /// }
    ///
    /// let id = tree.select(3).unwrap();
    /// assert_eq!(tree.key(id), Some(&4));
    /// assert_eq!(tree.select(0), Err(TreeError::InvalidRank { rank: 0, size: 5 }));
    /// assert_eq!(tree.select(6), Err(TreeError::InvalidRank { rank: 6, size: 5 }));
    /// ```
    pub fn select(&self, i: usize) -> Result<NodeId, TreeError> {
        match self.root {
            Some(root) => self.select_linked(i, root),
            None => {
                debug!("select({i}) on an empty tree");
                Err(TreeError::InvalidRank { rank: i, size: 0 })
            }
        }
    }

    /// The node holding the `i`-th smallest key (1-indexed) within the
    /// subtree rooted at `from`.
    pub fn select_from(&self, i: usize, from: NodeId) -> Result<NodeId, TreeError> {
        if !self.is_linked(from) {
            return Err(TreeError::NotFound);
        }
        self.select_linked(i, from)
    }

    fn select_linked(&self, mut i: usize, from: NodeId) -> Result<NodeId, TreeError> {
        let size = self.arena[from].size;
        if i < 1 || i > size {
            debug!("rank {i} is out of range for a subtree of {size}");
            return Err(TreeError::InvalidRank { rank: i, size });
        }

        let mut cursor = from;
        loop {
            let node = &self.arena[cursor];
            let size_left = self.arena.size_of(node.left);
            match i.cmp(&(size_left + 1)) {
                Ordering::Equal => return Ok(cursor),
                Ordering::Less => cursor = node.left.expect("rank within left subtree"),
                Ordering::Greater => {
                    i -= size_left + 1;
                    cursor = node.right.expect("rank within right subtree");
                }
            }
        }
    }
}

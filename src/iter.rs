use std::iter::FusedIterator;

use crate::node::{Node, NodeId};
use crate::tree::Tree;

/// In-order iterator over the nodes of a [`Tree`], created by
/// [`Tree::inorder`] and [`Tree::inorder_from`].
///
/// Uses an explicit stack bounded by the tree's height instead of recursion.
/// Cloning the iterator forks the walk at its current position.
///
/// # Examples
///
/// ```
/// use rank_tree::{Duplicates, Tree};
///
/// let mut tree = Tree::new();
/// for key in [3, 1, 2] {
///     tree.insert(key, key * 10, Duplicates::Reject).unwrap();
/// }
///
/// let payloads: Vec<_> = tree.inorder().map(|(_, node)| *node.payload()).collect();
/// assert_eq!(payloads, [10, 20, 30]);
/// ```
pub struct InOrder<'a, K, V> {
    tree: &'a Tree<K, V>,
    stack: Vec<NodeId>,
}

/// Manual implementation of `Clone` so we don't need `K: Clone` or `V: Clone`.
impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn new(tree: &'a Tree<K, V>, start: Option<NodeId>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(start);
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<NodeId>) {
        while let Some(id) = link {
            self.stack.push(id);
            link = self.tree.arena[id].left;
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (NodeId, &'a Node<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let id = self.stack.pop()?;
        let node = &tree.arena[id];
        self.push_left_spine(node.right);
        Some((id, node))
    }
}

impl<K, V> FusedIterator for InOrder<'_, K, V> {}

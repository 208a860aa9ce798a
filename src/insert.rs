use std::cmp::Ordering;

use log::debug;

use crate::balance::Rebalance;
use crate::error::TreeError;
use crate::node::NodeId;
use crate::tree::{Duplicates, Search, Tree};

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Creates a node for `key` and `payload` and links it into the tree.
    /// Returns the handle of the new node.
    ///
    /// With [`Duplicates::Reject`] inserting a key that is already present
    /// fails and leaves the tree untouched. With [`Duplicates::Allow`] the new
    /// node lands right before the existing equal keys in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    ///
    /// let first = tree.insert(1, "a", Duplicates::Reject).unwrap();
    /// assert_eq!(tree.insert(1, "b", Duplicates::Reject), Err(TreeError::DuplicateKey));
    ///
    /// let second = tree.insert(1, "c", Duplicates::Allow).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.rank(second), Some(1));
    /// assert_eq!(tree.rank(first), Some(2));
    /// ```
    pub fn insert(
        &mut self,
        key: K,
        payload: V,
        duplicates: Duplicates,
    ) -> Result<NodeId, TreeError> {
        let id = self.make_node(key, payload);
        match self.insert_node(id, duplicates) {
            Ok(_) => Ok(id),
            Err(e) => {
                self.arena.free(id);
                Err(e)
            }
        }
    }

    /// Links a detached node (see [`Tree::make_node`]) into the tree and
    /// rebalances on the way back up to the root.
    ///
    /// Equal keys are chained down the left: the new node is placed below the
    /// last node of the left chain of equal keys that starts at the node the
    /// search found, as the largest node of that node's left subtree.
    pub fn insert_node(&mut self, id: NodeId, duplicates: Duplicates) -> Result<Rebalance, TreeError> {
        if self.arena.get(id).is_none() {
            return Err(TreeError::NotFound);
        }
        if self.is_linked(id) {
            return Err(TreeError::AlreadyLinked);
        }

        let Some(root) = self.root else {
            self.root = Some(id);
            return Ok(Rebalance::default());
        };

        let search = self.search_from(&self.arena[id].key, root);
        let (anchor, side) = match search {
            Search::Miss(anchor) => {
                let side = if self.arena[id].key < self.arena[anchor].key {
                    Side::Left
                } else {
                    Side::Right
                };
                (anchor, side)
            }
            Search::Found(anchor) => match duplicates {
                Duplicates::Reject => {
                    debug!("rejected duplicate key, already held by {anchor}");
                    return Err(TreeError::DuplicateKey);
                }
                Duplicates::Allow => self.duplicate_slot(id, anchor),
            },
            Search::Empty => unreachable!("searching from the root of a non-empty tree"),
        };

        match side {
            Side::Left => self.arena[anchor].left = Some(id),
            Side::Right => self.arena[anchor].right = Some(id),
        }
        self.arena[id].parent = Some(anchor);

        Ok(self.retrace(Some(id)))
    }

    /// Finds the free slot for a node whose key equals the key of `found`.
    fn duplicate_slot(&self, id: NodeId, found: NodeId) -> (NodeId, Side) {
        let key = &self.arena[id].key;

        // Last node of the chain of equal keys hanging off the left of `found`.
        let mut last = found;
        while let Some(left) = self.arena[last].left {
            if self.arena[left].key.cmp(key) != Ordering::Equal {
                break;
            }
            last = left;
        }

        match self.arena[last].left {
            None => (last, Side::Left),
            Some(left) => (self.rightmost(left), Side::Right),
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Side {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::invariants::assert_invariants;

    fn keys<V>(tree: &Tree<i32, V>) -> Vec<i32> {
        tree.keys().copied().collect()
    }

    #[test]
    fn test_insert() {
        let mut tree = Tree::new();
        let id = tree.insert(1, 2, Duplicates::Reject).unwrap();

        assert_eq!(tree.search(&1), Search::Found(id));
        assert_eq!(tree.payload(id), Some(&2));
        assert_eq!(tree.root(), Some(id));
    }

    #[test]
    fn avl_insert_keeps_balance() {
        let mut tree = Tree::new();
        for key in [20, 10, 35, 15, 30, 45, 25, 40, 27, 26, 43, 41] {
            tree.insert(key, (), Duplicates::Reject).unwrap();
            assert_invariants(&tree);
        }

        assert_eq!(keys(&tree), [10, 15, 20, 25, 26, 27, 30, 35, 40, 41, 43, 45]);
    }

    #[test]
    fn duplicate_is_rejected_without_mutation() {
        let mut tree = Tree::plain();
        for key in [5, 3, 7] {
            tree.insert(key, (), Duplicates::Reject).unwrap();
        }
        let loose = tree.make_node(3, ());

        assert_eq!(tree.insert_node(loose, Duplicates::Reject), Err(TreeError::DuplicateKey));
        assert!(!tree.is_linked(loose));
        assert_eq!(tree.len(), 3);
        assert_eq!(keys(&tree), [3, 5, 7]);

        // The rejected node can still go in once duplicates are allowed.
        tree.insert_node(loose, Duplicates::Allow).unwrap();
        assert_eq!(keys(&tree), [3, 3, 5, 7]);
        assert_invariants(&tree);
    }

    #[test]
    fn rejected_insert_frees_its_node() {
        let mut tree = Tree::new();
        let first = tree.insert(1, (), Duplicates::Reject).unwrap();
        assert!(tree.insert(1, (), Duplicates::Reject).is_err());

        // The freed slot gets reused by the next insert, under a new generation.
        let second = tree.insert(2, (), Duplicates::Reject).unwrap();
        assert_ne!(first, second);
        assert_eq!((second.index, second.generation), (1, 1));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn inserting_linked_node_fails() {
        let mut tree = Tree::new();
        let id = tree.insert(1, (), Duplicates::Reject).unwrap();

        assert_eq!(tree.insert_node(id, Duplicates::Allow), Err(TreeError::AlreadyLinked));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn duplicates_chain_to_the_left() {
        let mut tree = Tree::plain();
        let first = tree.insert(20, 'a', Duplicates::Allow).unwrap();
        let second = tree.insert(20, 'b', Duplicates::Allow).unwrap();
        let third = tree.insert(20, 'c', Duplicates::Allow).unwrap();

        assert_eq!(tree.node(first).unwrap().left(), Some(second));
        assert_eq!(tree.node(second).unwrap().left(), Some(third));
        assert_invariants(&tree);
    }

    #[test]
    fn duplicate_below_smaller_left_subtree() {
        // 20 already has a smaller left child, so the new 20 becomes the
        // largest node of that subtree instead of displacing it.
        let mut tree = Tree::plain();
        let twenty = tree.insert(20, 'a', Duplicates::Allow).unwrap();
        let ten = tree.insert(10, 'x', Duplicates::Allow).unwrap();
        let twelve = tree.insert(12, 'y', Duplicates::Allow).unwrap();
        let dup = tree.insert(20, 'b', Duplicates::Allow).unwrap();

        assert_eq!(tree.node(twelve).unwrap().right(), Some(dup));
        assert_eq!(tree.predecessor(twenty), Some(dup));
        assert_eq!(tree.rank(ten), Some(1));
        assert_eq!(tree.rank(dup), Some(3));
        assert_eq!(keys(&tree), [10, 12, 20, 20]);
        assert_invariants(&tree);
    }

    #[test]
    fn many_duplicates_stay_balanced() {
        let mut tree = Tree::new();
        for i in 0..50 {
            tree.insert(i % 4, i, Duplicates::Allow).unwrap();
            assert_invariants(&tree);
        }
        assert_eq!(tree.len(), 50);
    }
}

//! Rotations and the AVL rebalancing built on top of them.

use log::trace;

use crate::node::NodeId;
use crate::tree::{Mode, Tree};

/// What a mutating operation did to keep the tree balanced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rebalance {
    /// Number of single rotations performed. A double rotation counts as two.
    pub rotations: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl<K, V> Tree<K, V> {
    /// Recomputes statistics from `from` all the way up to the root. In AVL
    /// mode every node found out of balance on the way is fixed before moving
    /// on to its (new) parent.
    pub(crate) fn retrace(&mut self, from: Option<NodeId>) -> Rebalance {
        let mut report = Rebalance::default();
        let mut cursor = from;
        while let Some(id) = cursor {
            self.arena.calc_stats(id);
            if self.mode == Mode::Avl && self.arena[id].balance.abs() >= 2 {
                report.rotations += self.balance_avl(id);
            }
            cursor = self.arena[id].parent;
        }
        report
    }

    /// Rotate the subtree rooted at `id`.
    ///
    /// A right rotation moves the left child up and `id` down. Returns `false`
    /// without touching anything when that child is missing.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///     id                       pivot
    ///    /  \                      /   \
    /// pivot  z    rotate right -> x     id
    ///  / \                             /  \
    /// x   y                           y    z
    /// ```
    ///
    /// Only `id` and `pivot` change which nodes sit below them, so those are
    /// the only two nodes whose statistics are recomputed. Ancestors above
    /// `pivot` keep their old heights until the caller retraces from
    /// `pivot`'s parent.
    pub(crate) fn rotate(&mut self, id: NodeId, direction: Direction) -> bool {
        let pivot = match direction {
            Direction::Right => self.arena[id].left,
            Direction::Left => self.arena[id].right,
        };
        let Some(pivot) = pivot else {
            return false;
        };
        let parent = self.arena[id].parent;

        let inner = match direction {
            Direction::Right => {
                let inner = self.arena[pivot].right;
                self.arena[pivot].right = Some(id);
                self.arena[id].left = inner;
                inner
            }
            Direction::Left => {
                let inner = self.arena[pivot].left;
                self.arena[pivot].left = Some(id);
                self.arena[id].right = inner;
                inner
            }
        };
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }

        self.arena[pivot].parent = parent;
        self.arena[id].parent = Some(pivot);
        self.replace_child(parent, id, Some(pivot));

        self.arena.calc_stats(id);
        self.arena.calc_stats(pivot);
        trace!("rotated {direction:?} at {id}, {pivot} moved up");
        true
    }

    /// Restores the AVL invariant at `id`, whose balance factor must be at
    /// least 2 in magnitude. Returns the number of rotations performed.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
    pub(crate) fn balance_avl(&mut self, id: NodeId) -> usize {
        let (balance, left, right) = {
            let node = &self.arena[id];
            (node.balance, node.left, node.right)
        };
        let rotations = if balance >= 2 {
            let right = right.expect("right heavy => right child");
            if self.arena[right].balance >= 0 {
                usize::from(self.rotate(id, Direction::Left))
            } else {
                trace!("right-left case at {id}");
                usize::from(self.rotate(right, Direction::Right))
                    + usize::from(self.rotate(id, Direction::Left))
            }
        } else if balance <= -2 {
            let left = left.expect("left heavy => left child");
            if self.arena[left].balance <= 0 {
                usize::from(self.rotate(id, Direction::Right))
            } else {
                trace!("left-right case at {id}");
                usize::from(self.rotate(left, Direction::Left))
                    + usize::from(self.rotate(id, Direction::Right))
            }
        } else {
            0
        };

        // After balancing, assert that we've restored the AVL invariant locally.
        if cfg!(debug_assertions) && rotations > 0 {
            let top = self.arena[id].parent.expect("rotated node has a new parent");
            assert!(self.arena[top].balance.abs() <= 1);
        }
        rotations
    }
}

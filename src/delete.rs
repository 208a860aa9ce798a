use log::debug;

use crate::balance::Rebalance;
use crate::error::TreeError;
use crate::node::NodeId;
use crate::tree::Tree;

impl<K, V> Tree<K, V> {
    /// Unlinks the node from the tree and rebalances on the way back up to
    /// the root. The node itself stays allocated, detached, so the caller can
    /// insert it again or [release](Tree::release) it.
    ///
    /// Fails with [`TreeError::NotFound`] if the node is not part of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    /// let one = tree.insert(1, 2, Duplicates::Reject).unwrap();
    ///
    /// tree.delete(one).unwrap();
    /// assert!(tree.search(&1).found().is_none());
    /// assert_eq!(tree.delete(one), Err(TreeError::NotFound));
    ///
    /// // Still ours to reuse.
    /// tree.insert_node(one, Duplicates::Reject).unwrap();
    /// assert_eq!(tree.search(&1).found(), Some(one));
    /// ```
    pub fn delete(&mut self, id: NodeId) -> Result<Rebalance, TreeError> {
        if !self.is_linked(id) {
            debug!("cannot delete {id}, it is not linked into this tree");
            return Err(TreeError::NotFound);
        }

        let (parent, left, right) = {
            let node = &self.arena[id];
            (node.parent, node.left, node.right)
        };

        // The lowest node whose subtree lost a member. Statistics are fixed
        // from there on upwards.
        let anchor = match (left, right) {
            (None, None) => {
                self.replace_child(parent, id, None);
                parent
            }
            (None, Some(child)) | (Some(child), None) => {
                self.replace_child(parent, id, Some(child));
                self.arena[child].parent = parent;
                parent
            }
            // If we have two children we have to figure out which node to
            // promote. We choose here this node's predecessor. That is, the
            // largest node in this node's left subtree. It has no right child.
            (Some(left), Some(right)) => {
                let pred = self.rightmost(left);
                let anchor = if pred == left {
                    // The predecessor keeps its left subtree and adopts ours
                    // on the right.
                    pred
                } else {
                    let pred_parent = self.arena[pred]
                        .parent
                        .expect("predecessor below the left child has a parent");
                    let pred_left = self.arena[pred].left;
                    self.replace_child(Some(pred_parent), pred, pred_left);
                    if let Some(pred_left) = pred_left {
                        self.arena[pred_left].parent = Some(pred_parent);
                    }

                    self.arena[pred].left = Some(left);
                    self.arena[left].parent = Some(pred);
                    pred_parent
                };

                self.arena[pred].right = Some(right);
                self.arena[right].parent = Some(pred);
                self.arena[pred].parent = parent;
                self.replace_child(parent, id, Some(pred));
                Some(anchor)
            }
        };

        self.arena[id].detach();
        Ok(self.retrace(anchor))
    }
}

//! Slot storage for tree nodes.
//!
//! Links between nodes are [`NodeId`]s into this arena rather than pointers,
//! so a parent link never owns anything. Freed slots are recycled; bumping the
//! slot's generation on every free keeps old handles from aliasing the new
//! occupant. Each arena also stamps its handles with its own tag, so a handle
//! from another tree never matches a slot here.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::node::{Node, NodeId};

#[derive(Clone, Debug)]
struct Slot<K, V> {
    generation: u32,
    node: Option<Node<K, V>>,
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    tag: u32,
    slots: Vec<Slot<K, V>>,
    free: Vec<u32>,
}

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

impl<K, V> Arena<K, V> {
    /// An empty arena with a fresh tag. Clones keep the tag, so a handle
    /// taken before cloning names the same node in both copies.
    pub(crate) fn new() -> Self {
        Self {
            tag: NEXT_TAG.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<K, V>> {
        if id.tree != self.tag {
            return None;
        }
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<K, V>> {
        if id.tree != self.tag {
            return None;
        }
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }

    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    tree: self.tag,
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).expect("more than u32::MAX nodes");
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    tree: self.tag,
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Removes the node from the arena. Returns `None` for stale handles.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let slot = self.slot_mut(id)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slot(id).and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.slot_mut(id).and_then(|slot| slot.node.as_mut())
    }

    /// Size of the subtree behind `link`, 0 for an empty link.
    pub(crate) fn size_of(&self, link: Option<NodeId>) -> usize {
        link.map_or(0, |id| self[id].size)
    }

    /// Height of the subtree behind `link`, -1 for an empty link.
    pub(crate) fn height_of(&self, link: Option<NodeId>) -> isize {
        link.map_or(-1, |id| self[id].height as isize)
    }

    /// Recomputes `size`, `height` and `balance` of `id` from its children.
    /// The children's statistics must already be correct.
    pub(crate) fn calc_stats(&mut self, id: NodeId) {
        let (left, right) = {
            let node = &self[id];
            (node.left, node.right)
        };
        let size = 1 + self.size_of(left) + self.size_of(right);
        let left_height = self.height_of(left);
        let right_height = self.height_of(right);

        let node = &mut self[id];
        node.size = size;
        node.height = (left_height.max(right_height) + 1) as usize;
        node.balance = right_height - left_height;
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("link to a node outside of the arena")
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("link to a node outside of the arena")
    }
}

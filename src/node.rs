use std::fmt;

/// A handle to a node stored in a [`Tree`](crate::Tree).
///
/// Handles are only meaningful for the tree that created them (and its
/// clones); any other tree treats them as unknown. Once a node is released its
/// handle goes stale and every tree operation rejects it, even if the
/// underlying slot is reused by a newer node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tree: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// A single vertex of a [`Tree`](crate::Tree).
///
/// Besides its key and payload a `Node` caches statistics about the subtree
/// rooted at it. They are kept up to date by the tree after every structural
/// change.
#[derive(Clone, Debug)]
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) payload: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,

    /// How many nodes are in the subtree rooted at this node, itself included.
    pub(crate) size: usize,
    /// How many edges are on the longest path down to a leaf. A node with no
    /// children has a height of 0.
    pub(crate) height: usize,
    /// Height of the right subtree minus height of the left subtree, where a
    /// missing subtree counts as -1.
    pub(crate) balance: isize,
}

impl<K, V> Node<K, V> {
    /// Construct a new, detached `Node` with the given `key` and `payload`.
    pub(crate) fn new(key: K, payload: V) -> Self {
        Self {
            key,
            payload,
            parent: None,
            left: None,
            right: None,
            size: 1,
            height: 0,
            balance: 0,
        }
    }

    /// Drops all links and resets the statistics to those of a lone node.
    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.size = 1;
        self.height = 0;
        self.balance = 0;
    }

    /// The key this node is ordered by.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The auxiliary data carried by this node.
    pub fn payload(&self) -> &V {
        &self.payload
    }

    /// The parent of this node, `None` for the root and for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The left child of this node.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The right child of this node.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Number of nodes in the subtree rooted at this node, itself included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of edges on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The difference in height between the right and left subtrees. See [the Wikipedia
    /// page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    pub fn balance(&self) -> isize {
        self.balance
    }
}

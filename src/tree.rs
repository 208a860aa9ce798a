use std::cmp::Ordering;
use std::fmt;

use log::debug;

use crate::arena::Arena;
use crate::error::TreeError;
use crate::iter::InOrder;
use crate::node::{Node, NodeId};

/// How a [`Tree`] keeps itself in shape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// A plain BST. Nodes stay wherever insertion put them.
    Plain,
    /// An AVL tree. Every insert and delete rotates nodes until no node's
    /// balance factor exceeds 1 in magnitude.
    #[default]
    Avl,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Avl => f.write_str("avl"),
        }
    }
}

/// What an insert does when the tree already holds an equal key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Duplicates {
    /// Fail with [`TreeError::DuplicateKey`].
    #[default]
    Reject,
    /// Insert the new node to the left of the existing equal keys.
    Allow,
}

/// The outcome of [`Tree::search`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Search {
    /// There was nothing to search.
    Empty,
    /// A node with an equal key.
    Found(NodeId),
    /// No equal key. Carries the node whose missing child is where the key
    /// would be inserted.
    Miss(NodeId),
}

impl Search {
    /// The matching node, if the search found one.
    pub fn found(self) -> Option<NodeId> {
        match self {
            Self::Found(id) => Some(id),
            Self::Empty | Self::Miss(_) => None,
        }
    }

    /// The node the search stopped at, whether it matched or not.
    pub fn anchor(self) -> Option<NodeId> {
        match self {
            Self::Found(id) | Self::Miss(id) => Some(id),
            Self::Empty => None,
        }
    }
}

/// An order-statistic Binary Search Tree that is optionally AVL balanced.
///
/// Nodes are created with [`Tree::make_node`] (or implicitly by
/// [`Tree::insert`]) and are referred to by [`NodeId`] handles afterwards.
/// Deleting a node unlinks it but keeps it around, detached, until it is
/// [released](Tree::release) or inserted again.
#[derive(Clone)]
pub struct Tree<K, V> {
    pub(crate) arena: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) mode: Mode,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("mode", &self.mode)
            .field("len", &self.len())
            .field("nodes", &self.inorder().map(|(_, n)| n).collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> fmt::Display for Tree<K, V>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tree of mode: {}, root: ", self.mode)?;
        match self.root {
            Some(root) => write!(f, "{}", self.arena[root].key),
            None => f.write_str("None"),
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty AVL `Tree`.
    pub fn new() -> Self {
        Self::with_mode(Mode::Avl)
    }

    /// Generate a new, empty `Tree` that never rebalances.
    pub fn plain() -> Self {
        Self::with_mode(Mode::Plain)
    }

    /// Generate a new, empty `Tree` with the given balancing mode.
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            mode,
        }
    }

    /// The balancing mode this tree was created with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The top node of the tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes linked into the tree. Detached nodes are not counted.
    pub fn len(&self) -> usize {
        self.arena.size_of(self.root)
    }

    /// Whether no node is linked into the tree.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree in edges, `None` when the tree is empty.
    pub fn height(&self) -> Option<usize> {
        self.root.map(|root| self.arena[root].height)
    }

    /// Looks up the node behind a handle. Works for detached nodes too.
    pub fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.arena.get(id)
    }

    /// Shortcut for the key of the node behind a handle.
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(Node::key)
    }

    /// Shortcut for the payload of the node behind a handle.
    pub fn payload(&self, id: NodeId) -> Option<&V> {
        self.node(id).map(Node::payload)
    }

    /// Mutable access to the payload of the node behind a handle. The key is
    /// not reachable this way since changing it could break the ordering.
    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.arena.get_mut(id).map(|n| &mut n.payload)
    }

    /// Whether the node is currently part of the tree (as opposed to detached
    /// or released).
    pub fn is_linked(&self, id: NodeId) -> bool {
        match self.arena.get(id) {
            Some(node) => node.parent.is_some() || self.root == Some(id),
            None => false,
        }
    }

    /// Creates a detached node. It becomes part of the tree once passed to
    /// [`Tree::insert_node`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let node = tree.make_node(7, "seven");
    /// assert!(!tree.is_linked(node));
    ///
    /// tree.insert_node(node, Duplicates::Reject).unwrap();
    /// assert!(tree.is_linked(node));
    /// assert_eq!(tree.payload(node), Some(&"seven"));
    /// ```
    pub fn make_node(&mut self, key: K, payload: V) -> NodeId {
        self.arena.alloc(Node::new(key, payload))
    }

    /// Frees a detached node and hands back its key and payload. The handle
    /// is stale afterwards.
    pub fn release(&mut self, id: NodeId) -> Result<(K, V), TreeError> {
        if self.arena.get(id).is_none() {
            return Err(TreeError::NotFound);
        }
        if self.is_linked(id) {
            debug!("refusing to release linked node {id}");
            return Err(TreeError::StillLinked);
        }
        let node = self.arena.free(id).ok_or(TreeError::NotFound)?;
        Ok((node.key, node.payload))
    }

    /// Deletes the node from the tree and releases it in one go.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let node = tree.insert(1, 2, Duplicates::Reject).unwrap();
    ///
    /// assert_eq!(tree.remove(node), Ok((1, 2)));
    /// assert!(tree.is_empty());
    /// assert!(tree.node(node).is_none());
    /// ```
    pub fn remove(&mut self, id: NodeId) -> Result<(K, V), TreeError> {
        self.delete(id)?;
        self.release(id)
    }

    /// Searches the whole tree for `key`. See [`Tree::search_from`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Search, Tree};
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.search(&3), Search::Empty);
    ///
    /// let five = tree.insert(5, (), Duplicates::Reject).unwrap();
    /// let three = tree.insert(3, (), Duplicates::Reject).unwrap();
    ///
    /// assert_eq!(tree.search(&3), Search::Found(three));
    /// // 4 would become the right child of 3.
    /// assert_eq!(tree.search(&4), Search::Miss(three));
    /// assert_eq!(tree.search(&9), Search::Miss(five));
    /// ```
    pub fn search(&self, key: &K) -> Search
    where
        K: Ord,
    {
        match self.root {
            Some(root) => self.descend(key, root),
            None => Search::Empty,
        }
    }

    /// Searches the subtree rooted at `from` for `key`. Equal keys are found
    /// at the first node on the path; otherwise smaller keys go left and
    /// larger keys go right until a child is missing.
    pub fn search_from(&self, key: &K, from: NodeId) -> Search
    where
        K: Ord,
    {
        if !self.is_linked(from) {
            return Search::Empty;
        }
        self.descend(key, from)
    }

    fn descend(&self, key: &K, from: NodeId) -> Search
    where
        K: Ord,
    {
        let mut cursor = from;
        loop {
            let node = &self.arena[cursor];
            let next = match key.cmp(&node.key) {
                Ordering::Equal => return Search::Found(cursor),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            match next {
                Some(next) => cursor = next,
                None => return Search::Miss(cursor),
            }
        }
    }

    /// A node with the smallest key, `None` when the tree is empty.
    pub fn find_min(&self) -> Option<NodeId> {
        self.root.map(|root| self.leftmost(root))
    }

    /// A node with the largest key, `None` when the tree is empty.
    pub fn find_max(&self) -> Option<NodeId> {
        self.root.map(|root| self.rightmost(root))
    }

    /// The smallest node of the subtree rooted at `from`.
    pub fn min_from(&self, from: NodeId) -> Option<NodeId> {
        self.is_linked(from).then(|| self.leftmost(from))
    }

    /// The largest node of the subtree rooted at `from`.
    pub fn max_from(&self, from: NodeId) -> Option<NodeId> {
        self.is_linked(from).then(|| self.rightmost(from))
    }

    pub(crate) fn leftmost(&self, mut cursor: NodeId) -> NodeId {
        while let Some(left) = self.arena[cursor].left {
            cursor = left;
        }
        cursor
    }

    pub(crate) fn rightmost(&self, mut cursor: NodeId) -> NodeId {
        while let Some(right) = self.arena[cursor].right {
            cursor = right;
        }
        cursor
    }

    /// The node right before `id` in key order.
    ///
    /// That is the largest node of the left subtree if there is one, otherwise
    /// the closest ancestor whose right subtree holds `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Duplicates, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let ids: Vec<_> = [2, 1, 3]
    ///     .into_iter()
    ///     .map(|k| tree.insert(k, (), Duplicates::Reject).unwrap())
    ///     .collect();
    ///
    /// assert_eq!(tree.predecessor(ids[0]), Some(ids[1]));
    /// assert_eq!(tree.predecessor(ids[2]), Some(ids[0]));
    /// assert_eq!(tree.predecessor(ids[1]), None);
    /// ```
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_linked(id) {
            return None;
        }
        if let Some(left) = self.arena[id].left {
            return Some(self.rightmost(left));
        }
        let mut child = id;
        let mut cursor = self.arena[id].parent;
        while let Some(parent) = cursor {
            let node = &self.arena[parent];
            if node.right == Some(child) {
                return Some(parent);
            }
            child = parent;
            cursor = node.parent;
        }
        None
    }

    /// The node right after `id` in key order. Mirror image of
    /// [`Tree::predecessor`].
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_linked(id) {
            return None;
        }
        if let Some(right) = self.arena[id].right {
            return Some(self.leftmost(right));
        }
        let mut child = id;
        let mut cursor = self.arena[id].parent;
        while let Some(parent) = cursor {
            let node = &self.arena[parent];
            if node.left == Some(child) {
                return Some(parent);
            }
            child = parent;
            cursor = node.parent;
        }
        None
    }

    /// Lazily walks the whole tree in ascending key order. Each call starts a
    /// fresh walk.
    pub fn inorder(&self) -> InOrder<'_, K, V> {
        InOrder::new(self, self.root)
    }

    /// Lazily walks the subtree rooted at `from` in ascending key order.
    pub fn inorder_from(&self, from: NodeId) -> InOrder<'_, K, V> {
        let start = self.is_linked(from).then_some(from);
        InOrder::new(self, start)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.inorder().map(|(_, node)| node.key())
    }

    /// Points whatever referenced `old` (its parent's child link or the root)
    /// at `new` instead. Does not touch `new`'s parent link.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = &mut self.arena[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            }
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (NodeId, &'a Node<K, V>);
    type IntoIter = InOrder<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inorder()
    }
}

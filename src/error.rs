use thiserror::Error;

/// Everything that can go wrong when operating on a [`Tree`](crate::Tree).
///
/// None of these are fatal: a failed operation leaves the tree exactly as it
/// was before the call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// A unique insert found a node with an equal key.
    #[error("a node with an equal key is already in the tree")]
    DuplicateKey,
    /// The node handle is stale or the node is not linked into the tree.
    #[error("node is not part of the tree")]
    NotFound,
    /// `select` was asked for a rank outside `1..=size`.
    #[error("rank {rank} is outside of 1..={size}")]
    InvalidRank {
        /// The requested rank.
        rank: usize,
        /// The size of the subtree the rank was looked up in.
        size: usize,
    },
    /// The node handed to `insert_node` is already linked into the tree.
    #[error("node is already linked into the tree")]
    AlreadyLinked,
    /// The node handed to `release` must be deleted first.
    #[error("node is still linked into the tree")]
    StillLinked,
}

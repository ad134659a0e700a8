use thiserror::Error;

use crate::node::NodeId;

/// Recoverable range faults.
///
/// Misuse of the tree itself (dereferencing a sentinel, handing in a stale
/// [`NodeId`], moving a node below itself) is a contract violation and panics
/// instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("path has no child to descend into at step {step}")]
    PathNoChild { step: usize },

    #[error("path runs out of siblings at step {step}")]
    PathNoSibling { step: usize },

    #[error("no node at depth {depth} below the reference node")]
    DepthOutOfRange { depth: usize },

    #[error("child index {index} out of range, node has {available} children")]
    ChildOutOfRange { index: usize, available: usize },

    #[error("no further node at the same depth")]
    NoNodeAtSameDepth,

    #[error("inconsistent tree at {node:?}: {reason}")]
    Inconsistent { node: NodeId, reason: String },
}

pub type TreeResult<T> = Result<T, TreeError>;

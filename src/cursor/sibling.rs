use super::{BidirectionalCursor, Cursor};
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Walks one sibling list.
///
/// Remembers the owning parent, so the end position of a child list (no
/// node) still knows which range it closes. Top-level ranges have no parent
/// and end at the feet sentinel instead.
#[derive(Debug, Clone, Copy)]
pub struct Sibling {
    node: Option<NodeId>,
    parent: Option<NodeId>,
}

impl Sibling {
    pub fn at<T, A: NodeAllocator<T>>(tree: &Tree<T, A>, node: NodeId) -> Self {
        Self {
            node: Some(node),
            parent: tree.node(node).parent,
        }
    }

    /// End position of `parent`'s child list.
    pub fn end_of(parent: NodeId) -> Self {
        Self {
            node: None,
            parent: Some(parent),
        }
    }

    pub(crate) fn raw(node: Option<NodeId>, parent: Option<NodeId>) -> Self {
        Self { node, parent }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn range_first<T, A: NodeAllocator<T>>(&self, tree: &Tree<T, A>) -> Option<NodeId> {
        match self.parent {
            Some(parent) => tree.first_child(parent),
            None => tree.first_root(),
        }
    }

    pub fn range_last<T, A: NodeAllocator<T>>(&self, tree: &Tree<T, A>) -> Option<NodeId> {
        match self.parent {
            Some(parent) => tree.last_child(parent),
            None => tree.last_root(),
        }
    }
}

impl PartialEq for Sibling {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && (self.node.is_some() || self.parent == other.parent)
    }
}

impl Eq for Sibling {}

impl Cursor for Sibling {
    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(id) = self.node else {
            panic!("advancing a sibling cursor past its end");
        };
        self.node = tree.node(id).next_sibling;
    }

    /// Sibling cursors never descend.
    fn set_skip_children(&mut self, _skip: bool) {}
}

impl BidirectionalCursor for Sibling {
    fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        self.node = match self.node {
            Some(id) => tree.node(id).prev_sibling,
            None => self.range_last(tree),
        };
    }
}

use std::mem;

use super::{climb_to_next, BidirectionalCursor, Cursor};
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Depth-first, parent before children.
#[derive(Debug, Clone)]
pub struct PreOrder {
    node: Option<NodeId>,
    skip_children: bool,
}

impl PreOrder {
    pub fn new(node: NodeId) -> Self {
        Self::at(Some(node))
    }

    pub(crate) fn at(node: Option<NodeId>) -> Self {
        Self {
            node,
            skip_children: false,
        }
    }
}

impl PartialEq for PreOrder {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for PreOrder {}

impl Cursor for PreOrder {
    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(id) = self.node else {
            panic!("advancing a pre-order cursor past its end");
        };
        if !mem::take(&mut self.skip_children) {
            if let Some(child) = tree.node(id).first_child {
                self.node = Some(child);
                return;
            }
        }
        self.node = climb_to_next(tree, id);
    }

    fn set_skip_children(&mut self, skip: bool) {
        self.skip_children = skip;
    }
}

impl BidirectionalCursor for PreOrder {
    fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(id) = self.node else {
            panic!("retreating a pre-order cursor past its start");
        };
        self.skip_children = false;
        let node = tree.node(id);
        self.node = match node.prev_sibling {
            Some(mut prev) => {
                while let Some(last) = tree.node(prev).last_child {
                    prev = last;
                }
                Some(prev)
            }
            None => node.parent,
        };
    }
}

use std::mem;

use super::{BidirectionalCursor, Cursor};
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Depth-first, children before parent.
#[derive(Debug, Clone)]
pub struct PostOrder {
    node: Option<NodeId>,
    skip_children: bool,
}

impl PostOrder {
    pub fn new(node: NodeId) -> Self {
        Self {
            node: Some(node),
            skip_children: false,
        }
    }

    /// Moves down to the first leaf below the current node, which is where
    /// a post-order walk of its subtree starts.
    pub fn descend_all<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(mut id) = self.node else {
            return;
        };
        while let Some(child) = tree.node(id).first_child {
            id = child;
        }
        self.node = Some(id);
    }
}

impl PartialEq for PostOrder {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for PostOrder {}

impl Cursor for PostOrder {
    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(id) = self.node else {
            panic!("advancing a post-order cursor past its end");
        };
        let node = tree.node(id);
        match node.next_sibling {
            None => {
                self.skip_children = false;
                self.node = node.parent;
            }
            Some(next) => {
                self.node = Some(next);
                if !mem::take(&mut self.skip_children) {
                    self.descend_all(tree);
                }
            }
        }
    }

    fn set_skip_children(&mut self, skip: bool) {
        self.skip_children = skip;
    }
}

impl BidirectionalCursor for PostOrder {
    fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(mut id) = self.node else {
            panic!("retreating a post-order cursor past its start");
        };
        let skip = mem::take(&mut self.skip_children);
        if let (false, Some(last)) = (skip, tree.node(id).last_child) {
            self.node = Some(last);
            return;
        }
        loop {
            let node = tree.node(id);
            if let Some(prev) = node.prev_sibling {
                self.node = Some(prev);
                return;
            }
            match node.parent {
                Some(parent) => id = parent,
                None => {
                    self.node = None;
                    return;
                }
            }
        }
    }
}

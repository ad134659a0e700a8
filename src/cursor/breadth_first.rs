use std::collections::VecDeque;
use std::mem;

use super::Cursor;
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Level-order cursor. Owns its FIFO of pending nodes, so it is forward-only
/// and cloning it copies the queue.
#[derive(Debug, Clone)]
pub struct BreadthFirst {
    queue: VecDeque<NodeId>,
    skip_children: bool,
}

impl BreadthFirst {
    pub fn new(start: NodeId) -> Self {
        Self::from_roots([start])
    }

    pub(crate) fn from_roots(roots: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            queue: roots.into_iter().collect(),
            skip_children: false,
        }
    }

    pub fn end() -> Self {
        Self::from_roots([])
    }

    /// Nodes discovered but not yet visited, current node first.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl PartialEq for BreadthFirst {
    fn eq(&self, other: &Self) -> bool {
        self.node() == other.node()
    }
}

impl Eq for BreadthFirst {}

impl Cursor for BreadthFirst {
    fn node(&self) -> Option<NodeId> {
        self.queue.front().copied()
    }

    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(id) = self.queue.pop_front() else {
            panic!("advancing a breadth-first cursor past its end");
        };
        if !mem::take(&mut self.skip_children) {
            let mut child = tree.node(id).first_child;
            while let Some(current) = child {
                self.queue.push_back(current);
                child = tree.node(current).next_sibling;
            }
        }
    }

    fn set_skip_children(&mut self, skip: bool) {
        self.skip_children = skip;
    }
}

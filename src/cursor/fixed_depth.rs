use super::{BidirectionalCursor, Cursor};
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Visits the nodes of one depth level from left to right, crossing over
/// into neighbouring subtrees. With a `top` anchor it never leaves `top`'s
/// subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDepth {
    node: Option<NodeId>,
    top: Option<NodeId>,
}

impl FixedDepth {
    /// Unanchored: walks the level across the whole tree.
    pub fn new(node: NodeId) -> Self {
        Self {
            node: Some(node),
            top: None,
        }
    }

    pub fn within(node: NodeId, top: NodeId) -> Self {
        Self {
            node: Some(node),
            top: Some(top),
        }
    }

    pub(crate) fn end_within(top: NodeId) -> Self {
        Self {
            node: None,
            top: Some(top),
        }
    }

    pub fn top(&self) -> Option<NodeId> {
        self.top
    }
}

impl Cursor for FixedDepth {
    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(mut id) = self.node else {
            panic!("advancing a fixed-depth cursor past its end");
        };
        let mut depth = 0;
        loop {
            if Some(id) == self.top {
                self.node = None;
                return;
            }
            let mut sibling = tree.next_sibling(id);
            while let Some(candidate) = sibling {
                if let Some(hit) = first_at_depth(tree, candidate, depth) {
                    self.node = Some(hit);
                    return;
                }
                sibling = tree.next_sibling(candidate);
            }
            match tree.node(id).parent {
                Some(parent) => {
                    id = parent;
                    depth += 1;
                }
                None => {
                    self.node = None;
                    return;
                }
            }
        }
    }

    /// Fixed-depth cursors always stay on their level.
    fn set_skip_children(&mut self, _skip: bool) {}
}

impl BidirectionalCursor for FixedDepth {
    fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(mut id) = self.node else {
            panic!("retreating a fixed-depth cursor past its start");
        };
        let mut depth = 0;
        loop {
            if Some(id) == self.top {
                self.node = None;
                return;
            }
            let mut sibling = tree.previous_sibling(id);
            while let Some(candidate) = sibling {
                if let Some(hit) = last_at_depth(tree, candidate, depth) {
                    self.node = Some(hit);
                    return;
                }
                sibling = tree.previous_sibling(candidate);
            }
            match tree.node(id).parent {
                Some(parent) => {
                    id = parent;
                    depth += 1;
                }
                None => {
                    self.node = None;
                    return;
                }
            }
        }
    }
}

/// Leftmost node exactly `depth` levels below `start`.
pub(crate) fn first_at_depth<T, A: NodeAllocator<T>>(
    tree: &Tree<T, A>,
    start: NodeId,
    depth: usize,
) -> Option<NodeId> {
    let mut id = start;
    let mut level = 0;
    loop {
        if level == depth {
            return Some(id);
        }
        if let Some(child) = tree.node(id).first_child {
            id = child;
            level += 1;
            continue;
        }
        loop {
            if level == 0 {
                return None;
            }
            if let Some(next) = tree.node(id).next_sibling {
                id = next;
                break;
            }
            id = tree.node(id).parent?;
            level -= 1;
        }
    }
}

/// Rightmost node exactly `depth` levels below `start`.
pub(crate) fn last_at_depth<T, A: NodeAllocator<T>>(
    tree: &Tree<T, A>,
    start: NodeId,
    depth: usize,
) -> Option<NodeId> {
    let mut id = start;
    let mut level = 0;
    loop {
        if level == depth {
            return Some(id);
        }
        if let Some(child) = tree.node(id).last_child {
            id = child;
            level += 1;
            continue;
        }
        loop {
            if level == 0 {
                return None;
            }
            if let Some(prev) = tree.node(id).prev_sibling {
                id = prev;
                break;
            }
            id = tree.node(id).parent?;
            level -= 1;
        }
    }
}

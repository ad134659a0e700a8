use super::{BidirectionalCursor, Cursor};
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Visits leaves only, left to right, optionally bounded to the subtree of
/// `top` (whose own position then serves as the end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    node: Option<NodeId>,
    top: Option<NodeId>,
}

impl Leaf {
    pub fn at(node: NodeId) -> Self {
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

    pub fn top(&self) -> Option<NodeId> {
        self.top
    }
}

pub(crate) fn deepest_first<T, A: NodeAllocator<T>>(tree: &Tree<T, A>, mut id: NodeId) -> NodeId {
    while let Some(child) = tree.node(id).first_child {
        id = child;
    }
    id
}

fn deepest_last<T, A: NodeAllocator<T>>(tree: &Tree<T, A>, mut id: NodeId) -> NodeId {
    while let Some(child) = tree.node(id).last_child {
        id = child;
    }
    id
}

impl Cursor for Leaf {
    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(mut id) = self.node else {
            panic!("advancing a leaf cursor past its end");
        };
        // the current leaf may have gained children since it was reached
        if tree.node(id).first_child.is_some() {
            self.node = Some(deepest_first(tree, id));
            return;
        }
        loop {
            let node = tree.node(id);
            if let Some(next) = node.next_sibling {
                id = next;
                break;
            }
            match node.parent {
                Some(parent) if Some(parent) == self.top => {
                    self.node = Some(parent);
                    return;
                }
                Some(parent) => id = parent,
                None => {
                    self.node = None;
                    return;
                }
            }
        }
        self.node = Some(deepest_first(tree, id));
    }

    fn set_skip_children(&mut self, _skip: bool) {}
}

impl BidirectionalCursor for Leaf {
    fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        let Some(mut id) = self.node else {
            panic!("retreating a leaf cursor past its start");
        };
        if self.top == Some(id) {
            // bounded end position: back onto the last leaf below top
            self.node = Some(tree.node(id).last_child.map_or(id, |last| deepest_last(tree, last)));
            return;
        }
        loop {
            let node = tree.node(id);
            if let Some(prev) = node.prev_sibling {
                self.node = Some(deepest_last(tree, prev));
                return;
            }
            match node.parent {
                Some(parent) if Some(parent) == self.top => {
                    self.node = Some(parent);
                    return;
                }
                Some(parent) => id = parent,
                None => {
                    self.node = None;
                    return;
                }
            }
        }
    }
}

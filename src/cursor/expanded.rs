use std::mem;

use super::{climb_to_next, BidirectionalCursor, Cursor};
use crate::alloc::NodeAllocator;
use crate::node::{Node, NodeId};
use crate::tree::Tree;

/// Pre-order over the rows an outline view currently shows: visible nodes
/// only, descending only into expanded nodes. Visits exactly
/// [`Tree::count_expanded`] nodes.
#[derive(Debug, Clone)]
pub struct Expanded {
    node: Option<NodeId>,
    skip_children: bool,
}

/// Pre-order over visible nodes regardless of expand state. Visits exactly
/// [`Tree::count_expandable`] nodes.
#[derive(Debug, Clone)]
pub struct Expandable {
    node: Option<NodeId>,
    skip_children: bool,
}

macro_rules! filtered_cursor {
    ($cursor:ident, $respect_expanded:expr) => {
        impl $cursor {
            pub fn new(node: NodeId) -> Self {
                Self {
                    node: Some(node),
                    skip_children: false,
                }
            }
        }

        impl PartialEq for $cursor {
            fn eq(&self, other: &Self) -> bool {
                self.node == other.node
            }
        }

        impl Eq for $cursor {}

        impl Cursor for $cursor {
            fn node(&self) -> Option<NodeId> {
                self.node
            }

            fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
                let Some(id) = self.node else {
                    panic!("advancing a filtered cursor past its end");
                };
                let skip = mem::take(&mut self.skip_children);
                self.node = next_shown(tree, id, skip, $respect_expanded);
            }

            fn set_skip_children(&mut self, skip: bool) {
                self.skip_children = skip;
            }
        }

        impl BidirectionalCursor for $cursor {
            fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
                let Some(id) = self.node else {
                    panic!("retreating a filtered cursor past its start");
                };
                self.skip_children = false;
                self.node = prev_shown(tree, id, $respect_expanded);
            }
        }
    };
}

filtered_cursor!(Expanded, true);
filtered_cursor!(Expandable, false);

fn opens<T>(node: &Node<T>, respect_expanded: bool) -> bool {
    node.expanded || !respect_expanded
}

fn next_shown<T, A: NodeAllocator<T>>(
    tree: &Tree<T, A>,
    mut id: NodeId,
    mut skip: bool,
    respect_expanded: bool,
) -> Option<NodeId> {
    loop {
        let node = tree.node(id);
        let descend = match node.first_child {
            Some(child) if !skip && opens(node, respect_expanded) => Some(child),
            _ => None,
        };
        skip = false;
        id = match descend {
            Some(child) => child,
            None => climb_to_next(tree, id)?,
        };
        // feet is visible, so the walk always halts at the end
        if tree.node(id).visible {
            return Some(id);
        }
    }
}

fn prev_shown<T, A: NodeAllocator<T>>(
    tree: &Tree<T, A>,
    mut id: NodeId,
    respect_expanded: bool,
) -> Option<NodeId> {
    loop {
        let node = tree.node(id);
        id = match node.prev_sibling {
            Some(mut prev) => {
                loop {
                    let record = tree.node(prev);
                    match record.last_child {
                        Some(last) if opens(record, respect_expanded) => prev = last,
                        _ => break,
                    }
                }
                prev
            }
            None => node.parent?,
        };
        let node = tree.node(id);
        if node.visible || node.is_sentinel() {
            return Some(id);
        }
    }
}

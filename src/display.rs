use std::fmt;

use tracing::instrument;

use crate::alloc::NodeAllocator;
use crate::cursor::{Cursor, PostOrder};
use crate::node::NodeId;
use crate::tree::Tree;

/// Rendering through `termtree`, for logs and debugging output.
pub trait TreeDisplay {
    /// The subtree at `id` as a `termtree`.
    fn to_tree_string(&self, id: NodeId) -> termtree::Tree<String>;
}

impl<T: fmt::Display, A: NodeAllocator<T>> TreeDisplay for Tree<T, A> {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self, id: NodeId) -> termtree::Tree<String> {
        // post-order: each node's children are the last finished entries
        let mut finished: Vec<termtree::Tree<String>> = Vec::new();
        let mut cursor = PostOrder::new(id);
        cursor.descend_all(self);
        while let Some(current) = cursor.node() {
            let children = self.number_of_children(current);
            let leaves = finished.split_off(finished.len().saturating_sub(children));
            finished.push(termtree::Tree::new(self.get(current).to_string()).with_leaves(leaves));
            if current == id {
                break;
            }
            cursor.advance(self);
        }
        match finished.pop() {
            Some(rendered) => rendered,
            None => termtree::Tree::new(String::new()),
        }
    }
}

impl<T: fmt::Display, A: NodeAllocator<T>> fmt::Display for Tree<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (root, _) in self.roots() {
            write!(f, "{}", self.to_tree_string(root))?;
        }
        Ok(())
    }
}

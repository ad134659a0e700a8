use std::collections::HashSet;

use tracing::instrument;

use crate::alloc::NodeAllocator;
use crate::config::TreeConfig;
use crate::cursor::Sibling;
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::Tree;

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    /// Sibling offsets leading from `top` down to `node`.
    ///
    /// Entry 0 counts steps to the right of `top` within its own sibling
    /// list (usually 0); each further entry descends to a first child and
    /// counts steps to the right from there. Decoded by
    /// [`node_from_path`](Tree::node_from_path).
    pub fn path_from_node(&self, node: NodeId, top: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut walk = node;
        loop {
            if !path.is_empty() {
                walk = match self.node(walk).parent {
                    Some(parent) => parent,
                    None => break,
                };
            }
            let mut steps = 0;
            while walk != top {
                match self.previous_sibling(walk) {
                    Some(prev) => {
                        steps += 1;
                        walk = prev;
                    }
                    None => break,
                }
            }
            path.push(steps);
            if walk == top || self.node(walk).parent.is_none() {
                break;
            }
        }
        path.reverse();
        path
    }

    pub fn node_from_path(&self, path: &[usize], top: NodeId) -> TreeResult<NodeId> {
        let mut walk = top;
        for (step, &offset) in path.iter().enumerate() {
            if step > 0 {
                walk = self
                    .node(walk)
                    .first_child
                    .ok_or(TreeError::PathNoChild { step })?;
            }
            for _ in 0..offset {
                walk = self.next_sibling(walk).ok_or(TreeError::PathNoSibling { step })?;
            }
        }
        Ok(walk)
    }

    /// Path of `node` from the top level, counting only visible siblings at
    /// each level: the row coordinates an outline view would use.
    pub fn path_from_expanded(&self, node: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut walk = Some(node);
        while let Some(id) = walk {
            let mut shown = 0;
            let mut sibling = self.previous_sibling(id);
            while let Some(prev) = sibling {
                shown += usize::from(self.node(prev).visible);
                sibling = self.previous_sibling(prev);
            }
            path.push(shown);
            walk = self.node(id).parent;
        }
        path.reverse();
        path
    }

    /// Deepest node that is `a` or an ancestor of `a` and also `b` or an
    /// ancestor of `b`; `None` if they sit in different top-level trees.
    #[instrument(level = "trace", skip(self))]
    pub fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut ancestors = HashSet::new();
        let mut walk = Some(a);
        while let Some(id) = walk {
            ancestors.insert(id);
            walk = self.node(id).parent;
        }
        let mut walk = Some(b);
        while let Some(id) = walk {
            if ancestors.contains(&id) {
                return Some(id);
            }
            walk = self.node(id).parent;
        }
        None
    }

    /// Copy of the sibling run `[from, to)` as the top level of a new tree
    /// with the same defaults.
    #[instrument(level = "trace", skip(self))]
    pub fn subtree(&self, from: &Sibling, to: &Sibling) -> Tree<T, A>
    where
        T: Clone,
    {
        let config: TreeConfig = self.config();
        let mut copy = Tree::with_config_in(config, A::default());
        for source in self.sibling_run(from, to) {
            let slot = copy.slot_before(copy.feet());
            copy.graft_copy(slot, self, source, true);
        }
        copy
    }
}

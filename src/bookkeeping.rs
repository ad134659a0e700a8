//! Expand/collapse state, visibility filtering and the row counters an
//! outline view reads.
//!
//! Per node, with `shown` being 1 for a visible node and 0 otherwise:
//! - `count` = 1 + sum over children
//! - `count_expandable` = `shown` + sum over children
//! - `count_expanded` = `shown` + (sum over children if expanded, else 0)
//!
//! The head sentinel aggregates the top level and always counts as open.

use tracing::{debug, instrument};

use crate::alloc::NodeAllocator;
use crate::cursor::{BidirectionalCursor, Cursor, Expanded, PreOrder};
use crate::node::NodeId;
use crate::tree::Tree;

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    pub fn is_expanded(&self, pos: NodeId) -> bool {
        self.node(pos).expanded
    }

    pub fn is_visible(&self, pos: NodeId) -> bool {
        self.node(pos).visible
    }

    /// Rows the tree shows in its current state.
    pub fn count_expanded(&self) -> usize {
        self.node(self.head()).count_expanded
    }

    pub fn count_expanded_of(&self, pos: NodeId) -> usize {
        self.node(pos).count_expanded
    }

    /// Rows the tree shows when fully expanded.
    pub fn count_expandable(&self) -> usize {
        self.node(self.head()).count_expandable
    }

    pub fn count_expandable_of(&self, pos: NodeId) -> usize {
        self.node(pos).count_expandable
    }

    /// Default expand state for nodes created from now on.
    pub fn set_expand_new(&mut self, expanded: bool) {
        let head = self.head();
        self.node_mut(head).expanded = expanded;
    }

    #[instrument(level = "trace", skip(self))]
    pub fn expand(&mut self, pos: NodeId) {
        assert!(self.is_valid(pos), "cannot expand sentinel or stale node {pos:?}");
        if self.node(pos).expanded {
            return;
        }
        let gained = self.children_expanded(pos);
        let node = self.node_mut(pos);
        node.expanded = true;
        node.count_expanded += gained;
        self.propagate_expanded(pos, gained, 0);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn collapse(&mut self, pos: NodeId) {
        assert!(self.is_valid(pos), "cannot collapse sentinel or stale node {pos:?}");
        if !self.node(pos).expanded {
            return;
        }
        let lost = self.children_expanded(pos);
        let node = self.node_mut(pos);
        node.expanded = false;
        node.count_expanded -= lost;
        self.propagate_expanded(pos, 0, lost);
    }

    fn children_expanded(&self, pos: NodeId) -> usize {
        self.children(pos)
            .map(|(id, _)| self.node(id).count_expanded)
            .sum()
    }

    /// Expands every node that has children.
    #[instrument(level = "debug", skip(self))]
    pub fn expand_all(&mut self) {
        self.set_expanded_where_parent(true);
    }

    /// Collapses every node that has children.
    #[instrument(level = "debug", skip(self))]
    pub fn collapse_all(&mut self) {
        self.set_expanded_where_parent(false);
    }

    fn set_expanded_where_parent(&mut self, expanded: bool) {
        let parents: Vec<NodeId> = self
            .iter()
            .map(|(id, _)| id)
            .filter(|&id| self.node(id).first_child.is_some())
            .collect();
        for id in parents {
            self.node_mut(id).expanded = expanded;
        }
        self.recount();
    }

    /// Shows exactly the nodes whose payload satisfies `keep`, plus their
    /// ancestors, and expands every node with children. Returns the number
    /// of rows now shown.
    #[instrument(level = "debug", skip(self, keep))]
    pub fn filter<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let order: Vec<NodeId> = self.iter().map(|(id, _)| id).collect();
        for id in order {
            let visible = keep(self.get(id));
            let node = self.node_mut(id);
            if node.first_child.is_some() {
                node.expanded = true;
            }
            node.visible = visible;
            if !visible {
                continue;
            }
            // ancestors come earlier in pre-order, so the first visible one
            // already has a visible chain above it
            let mut ancestor = self.node(id).parent;
            while let Some(up) = ancestor {
                let node = self.node_mut(up);
                if node.visible {
                    break;
                }
                node.visible = true;
                ancestor = node.parent;
            }
        }
        self.recount();
        let shown = self.count_expanded();
        debug!(shown, "filtered tree");
        shown
    }

    /// Recomputes every counter bottom-up in one pass.
    pub(crate) fn recount(&mut self) {
        let order: Vec<NodeId> = self.iter_post().map(|(id, _)| id).collect();
        for id in order {
            let mut count = 1;
            let mut expanded = 0;
            let mut expandable = 0;
            let mut child = self.node(id).first_child;
            while let Some(current) = child {
                let record = self.node(current);
                count += record.count;
                expanded += record.count_expanded;
                expandable += record.count_expandable;
                child = record.next_sibling;
            }
            let node = self.node_mut(id);
            let shown = usize::from(node.visible);
            node.count = count;
            node.count_expandable = shown + expandable;
            node.count_expanded = shown + if node.expanded { expanded } else { 0 };
        }
        let (mut count, mut expanded, mut expandable) = (0, 0, 0);
        for (id, _) in self.roots() {
            let record = self.node(id);
            count += record.count;
            expanded += record.count_expanded;
            expandable += record.count_expandable;
        }
        let head = self.head();
        let aggregate = self.node_mut(head);
        aggregate.count = count;
        aggregate.count_expanded = expanded;
        aggregate.count_expandable = expandable;
    }

    /// Position of `pos` in a full pre-order walk.
    pub fn preorder_index(&self, pos: NodeId) -> usize {
        let mut cursor = PreOrder::new(pos);
        let mut index = 0;
        loop {
            cursor.retreat(self);
            match cursor.node() {
                Some(id) if id != self.head() => index += 1,
                _ => return index,
            }
        }
    }

    /// Row of `pos` among the rows currently shown.
    pub fn expanded_index(&self, pos: NodeId) -> usize {
        let mut cursor = Expanded::new(pos);
        let mut index = 0;
        loop {
            cursor.retreat(self);
            match cursor.node() {
                Some(id) if id != self.head() => index += 1,
                _ => return index,
            }
        }
    }
}

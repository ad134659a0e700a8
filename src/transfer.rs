//! Moving subtrees around without copying payloads.
//!
//! Moves inside one tree relink in O(1) plus an O(depth) counter update.
//! Moves between trees additionally hand every moved record over to the
//! receiving tree's store. Payloads are never cloned, the allocation
//! strategy is not involved, and every moved node keeps its handle.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::alloc::NodeAllocator;
use crate::cursor::{Cursor, Sibling};
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::Tree;

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    // ============================================================
    // Between trees
    // ============================================================

    /// Detaches the subtree at `pos` and returns a new tree owning exactly
    /// that subtree, with the same defaults as `self`. Handles of the moved
    /// nodes now belong to the returned tree.
    #[instrument(level = "trace", skip(self))]
    pub fn move_out(&mut self, pos: NodeId) -> Tree<T, A> {
        assert!(self.is_valid(pos), "move_out of sentinel or stale node {pos:?}");
        self.unlink(pos);
        let mut out = Tree::with_config_in(self.config(), A::default());
        let taken = out.take_subtree(self, pos);
        let slot = out.slot_before(out.feet());
        out.link(pos, slot);
        debug!(nodes = taken, "moved subtree out");
        out
    }

    /// Moves every top-level subtree of `other` in front of `loc`, keeping
    /// their order. `other` is left empty. Returns the first moved node, or
    /// `loc` when `other` was empty.
    #[instrument(level = "trace", skip(self, other))]
    pub fn move_in<B: NodeAllocator<T>>(&mut self, loc: NodeId, other: &mut Tree<T, B>) -> NodeId {
        let slot = self.slot_before(loc);
        match self.drain_roots(other) {
            Some((first, last)) => {
                self.link_range(first, last, slot);
                first
            }
            None => loc,
        }
    }

    /// Moves every top-level subtree of `other` below `loc`, after its
    /// existing children.
    #[instrument(level = "trace", skip(self, other))]
    pub fn move_in_below<B: NodeAllocator<T>>(&mut self, loc: NodeId, other: &mut Tree<T, B>) -> NodeId {
        let slot = self.slot_last_child(loc);
        match self.drain_roots(other) {
            Some((first, last)) => {
                self.link_range(first, last, slot);
                first
            }
            None => loc,
        }
    }

    /// Moves every top-level subtree of `other` below `loc` so the first of
    /// them becomes child number `n`.
    ///
    /// Fails without touching either tree if `loc` has fewer than `n`
    /// children.
    #[instrument(level = "trace", skip(self, other))]
    pub fn move_in_as_nth_child<B: NodeAllocator<T>>(
        &mut self,
        loc: NodeId,
        n: usize,
        other: &mut Tree<T, B>,
    ) -> TreeResult<NodeId> {
        let available = self.number_of_children(loc);
        if n > available {
            return Err(TreeError::ChildOutOfRange { index: n, available });
        }
        let slot = match n.checked_sub(1).and_then(|prev| self.child(loc, prev)) {
            Some(prev) => self.slot_after(prev),
            None => self.slot_first_child(loc),
        };
        Ok(match self.drain_roots(other) {
            Some((first, last)) => {
                self.link_range(first, last, slot);
                first
            }
            None => loc,
        })
    }

    /// Empties `other` and takes over its top-level subtrees as a detached
    /// sibling run, in their original order.
    fn drain_roots<B: NodeAllocator<T>>(&mut self, other: &mut Tree<T, B>) -> Option<(NodeId, NodeId)> {
        let (first, last) = (other.first_root()?, other.last_root()?);
        other.unlink_range(first, last);

        let mut taken = 0;
        let mut root = Some(first);
        while let Some(id) = root {
            root = other.node(id).next_sibling;
            taken += self.take_subtree(other, id);
        }
        debug!(nodes = taken, "drained top-level subtrees");
        Some((first, last))
    }

    // ============================================================
    // Within one tree
    // ============================================================

    #[track_caller]
    fn assert_movable(&self, source: NodeId) {
        assert!(self.is_valid(source), "cannot move sentinel or stale node {source:?}");
    }

    #[track_caller]
    fn assert_not_below(&self, target: NodeId, source: NodeId) {
        assert!(
            !self.is_in_subtree(target, source),
            "cannot move {source:?} into its own subtree"
        );
    }

    /// Makes `source` (with its subtree) the previous sibling of `target`.
    /// `target` may be the feet sentinel.
    #[instrument(level = "trace", skip(self))]
    pub fn move_before(&mut self, target: NodeId, source: NodeId) -> NodeId {
        self.assert_movable(source);
        if target == source || self.node(source).next_sibling == Some(target) {
            return source;
        }
        self.assert_not_below(target, source);
        self.unlink(source);
        let slot = self.slot_before(target);
        self.link(source, slot);
        source
    }

    /// Makes `source` (with its subtree) the next sibling of `target`.
    #[instrument(level = "trace", skip(self))]
    pub fn move_after(&mut self, target: NodeId, source: NodeId) -> NodeId {
        self.assert_movable(source);
        if target == source || self.node(source).prev_sibling == Some(target) {
            return source;
        }
        self.assert_not_below(target, source);
        self.unlink(source);
        let slot = self.slot_after(target);
        self.link(source, slot);
        source
    }

    /// Moves `source` in front of a sibling position; an end position makes
    /// it the last child of that parent.
    #[instrument(level = "trace", skip(self))]
    pub fn move_to(&mut self, pos: &Sibling, source: NodeId) -> NodeId {
        match (pos.node(), pos.parent()) {
            (Some(target), _) => self.move_before(target, source),
            (None, Some(parent)) => {
                self.assert_movable(source);
                if self.node(parent).last_child == Some(source) {
                    return source;
                }
                self.assert_not_below(parent, source);
                self.unlink(source);
                let slot = self.slot_last_child(parent);
                self.link(source, slot);
                source
            }
            (None, None) => panic!("sibling cursor has neither node nor parent"),
        }
    }

    /// Destroys `target`'s subtree and puts `source` in its place. `source`
    /// may live below `target`.
    #[instrument(level = "trace", skip(self))]
    pub fn move_ontop(&mut self, target: NodeId, source: NodeId) -> NodeId {
        self.assert_movable(source);
        if target == source {
            return source;
        }
        self.assert_not_below(target, source);
        assert!(self.is_valid(target), "cannot replace sentinel or stale node {target:?}");
        self.unlink(source);
        let slot = self.unlink(target);
        self.destroy(target);
        self.link(source, slot);
        source
    }

    /// Inserts `value` in place of `pos` and moves `pos` below it.
    #[instrument(level = "trace", skip(self, value))]
    pub fn wrap(&mut self, pos: NodeId, value: T) -> NodeId {
        assert!(self.is_valid(pos), "cannot wrap sentinel or stale node {pos:?}");
        let wrapper = self.insert(pos, value);
        self.unlink(pos);
        let slot = self.slot_last_child(wrapper);
        self.link(pos, slot);
        wrapper
    }

    /// Inserts `value` in front of `from` and moves the sibling run
    /// `[from, to)` below it.
    #[instrument(level = "trace", skip(self, value))]
    pub fn wrap_range(&mut self, from: NodeId, to: &Sibling, value: T) -> NodeId {
        assert!(self.is_valid(from), "cannot wrap sentinel or stale node {from:?}");
        let run = self.sibling_run(&Sibling::at(self, from), to);
        let last = run.last().copied().unwrap_or(from);
        let wrapper = self.insert(from, value);
        self.unlink_range(from, last);
        let slot = self.slot_last_child(wrapper);
        self.link_range(from, last, slot);
        wrapper
    }

    /// Turns the children of `pos` into its following siblings.
    #[instrument(level = "trace", skip(self))]
    pub fn flatten(&mut self, pos: NodeId) -> NodeId {
        let node = self.node(pos);
        if let (Some(first), Some(last)) = (node.first_child, node.last_child) {
            self.unlink_range(first, last);
            let slot = self.slot_after(pos);
            self.link_range(first, last, slot);
        }
        pos
    }

    /// Moves the sibling run `[begin, end)` below `pos`, after its existing
    /// children. Returns the first moved node.
    #[instrument(level = "trace", skip(self))]
    pub fn reparent(&mut self, pos: NodeId, begin: &Sibling, end: &Sibling) -> Option<NodeId> {
        let run = self.sibling_run(begin, end);
        let (&first, &last) = (run.first()?, run.last()?);
        assert!(self.is_valid(pos), "cannot reparent below sentinel or stale node {pos:?}");
        let members: HashSet<NodeId> = run.iter().copied().collect();
        let mut cursor = Some(pos);
        while let Some(id) = cursor {
            assert!(!members.contains(&id), "cannot reparent {id:?} below itself");
            cursor = self.node(id).parent;
        }
        self.unlink_range(first, last);
        let slot = self.slot_last_child(pos);
        self.link_range(first, last, slot);
        Some(first)
    }

    /// Moves all children of `from` below `pos`.
    #[instrument(level = "trace", skip(self))]
    pub fn reparent_children(&mut self, pos: NodeId, from: NodeId) -> Option<NodeId> {
        if pos == from {
            return None;
        }
        let begin = self.begin_children(from);
        self.reparent(pos, &begin, &Sibling::end_of(from))
    }

    /// Exchanges `pos` with its next sibling, if it has one.
    #[instrument(level = "trace", skip(self))]
    pub fn swap_with_next(&mut self, pos: NodeId) {
        if let Some(next) = self.next_sibling(pos) {
            self.unlink(next);
            let slot = self.slot_before(pos);
            self.link(next, slot);
        }
    }

    /// Exchanges the positions of two subtrees anywhere in the tree; both
    /// keep their handles.
    #[instrument(level = "trace", skip(self))]
    pub fn swap_nodes(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        assert!(self.is_valid(a) && self.is_valid(b), "cannot swap sentinels or stale nodes");
        assert!(
            !self.is_in_subtree(a, b) && !self.is_in_subtree(b, a),
            "cannot swap a node with its own ancestor"
        );
        if self.node(a).next_sibling == Some(b) {
            self.swap_with_next(a);
            return;
        }
        if self.node(b).next_sibling == Some(a) {
            self.swap_with_next(b);
            return;
        }
        let slot_a = self.unlink(a);
        let slot_b = self.unlink(b);
        self.link(b, slot_a);
        self.link(a, slot_b);
    }
}

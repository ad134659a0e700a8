//! Structural mutation primitives: insertion, subtree copy, erase, replace.

use tracing::{debug, instrument};

use crate::alloc::NodeAllocator;
use crate::cursor::{Cursor, PreOrder, Sibling};
use crate::node::NodeId;
use crate::tree::{Slot, Tree};

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    // ============================================================
    // Single-value insertion
    // ============================================================

    /// Inserts the single top-level node of an empty tree.
    ///
    /// # Panics
    /// If the tree is not empty.
    #[instrument(level = "trace", skip(self, value))]
    pub fn set_root(&mut self, value: T) -> NodeId {
        assert!(self.is_empty(), "set_root on a non-empty tree");
        let feet = self.feet();
        self.insert(feet, value)
    }

    /// Inserts `value` as the previous sibling of `pos`. Passing the feet
    /// sentinel appends a new top-level node.
    #[instrument(level = "trace", skip(self, value))]
    pub fn insert(&mut self, pos: NodeId, value: T) -> NodeId {
        let slot = self.slot_before(pos);
        self.place(slot, value)
    }

    /// Like [`insert`](Tree::insert), but also accepts the end position of
    /// a child list, which appends to that parent.
    #[instrument(level = "trace", skip(self, value))]
    pub fn insert_at(&mut self, pos: &Sibling, value: T) -> NodeId {
        let slot = self.slot_at(pos);
        self.place(slot, value)
    }

    #[instrument(level = "trace", skip(self, value))]
    pub fn insert_after(&mut self, pos: NodeId, value: T) -> NodeId {
        let slot = self.slot_after(pos);
        self.place(slot, value)
    }

    #[instrument(level = "trace", skip(self, value))]
    pub fn append_child(&mut self, pos: NodeId, value: T) -> NodeId {
        let slot = self.slot_last_child(pos);
        self.place(slot, value)
    }

    #[instrument(level = "trace", skip(self, value))]
    pub fn prepend_child(&mut self, pos: NodeId, value: T) -> NodeId {
        let slot = self.slot_first_child(pos);
        self.place(slot, value)
    }

    fn place(&mut self, slot: Slot, value: T) -> NodeId {
        let id = self.create(value);
        self.link(id, slot);
        id
    }

    // ============================================================
    // Subtree copies
    // ============================================================

    /// Copies `from`'s subtree out of `src` into `slot` and returns the new
    /// root. The copy walks the source iteratively, bounded by the sibling
    /// following `from`, so arbitrarily deep subtrees are fine.
    pub(crate) fn graft_copy<B: NodeAllocator<T>>(
        &mut self,
        slot: Slot,
        src: &Tree<T, B>,
        from: NodeId,
        keep_flags: bool,
    ) -> NodeId
    where
        T: Clone,
    {
        let root = self.copy_node(src, from, keep_flags);
        self.link(root, slot);

        let boundary = src.node(from).next_sibling;
        let mut current = from;
        let mut target = root;
        loop {
            if let Some(child) = src.node(current).first_child {
                current = child;
                let copy = self.copy_node(src, child, keep_flags);
                let slot = self.slot_last_child(target);
                self.link(copy, slot);
                target = copy;
                continue;
            }
            while current != from && src.node(current).next_sibling.is_none() {
                current = src.node(current).parent.unwrap_or(from);
                target = self.node(target).parent.unwrap_or(root);
            }
            if current == from {
                break;
            }
            current = match src.node(current).next_sibling {
                Some(next) if Some(next) != boundary => next,
                _ => break,
            };
            let copy = self.copy_node(src, current, keep_flags);
            let slot = self.slot_after(target);
            self.link(copy, slot);
            target = copy;
        }
        root
    }

    fn copy_node<B: NodeAllocator<T>>(&mut self, src: &Tree<T, B>, id: NodeId, keep_flags: bool) -> NodeId
    where
        T: Clone,
    {
        let value = src.get(id).clone();
        if keep_flags {
            let node = src.node(id);
            self.create_with(value, node.expanded, node.visible)
        } else {
            self.create(value)
        }
    }

    /// Inserts a copy of `src`'s subtree at `from` before `pos`.
    #[instrument(level = "trace", skip(self, src))]
    pub fn insert_subtree<B: NodeAllocator<T>>(&mut self, pos: NodeId, src: &Tree<T, B>, from: NodeId) -> NodeId
    where
        T: Clone,
    {
        let slot = self.slot_before(pos);
        self.graft_copy(slot, src, from, false)
    }

    #[instrument(level = "trace", skip(self, src))]
    pub fn insert_subtree_at<B: NodeAllocator<T>>(&mut self, pos: &Sibling, src: &Tree<T, B>, from: NodeId) -> NodeId
    where
        T: Clone,
    {
        let slot = self.slot_at(pos);
        self.graft_copy(slot, src, from, false)
    }

    #[instrument(level = "trace", skip(self, src))]
    pub fn insert_subtree_after<B: NodeAllocator<T>>(
        &mut self,
        pos: NodeId,
        src: &Tree<T, B>,
        from: NodeId,
    ) -> NodeId
    where
        T: Clone,
    {
        let slot = self.slot_after(pos);
        self.graft_copy(slot, src, from, false)
    }

    #[instrument(level = "trace", skip(self, src))]
    pub fn append_child_subtree<B: NodeAllocator<T>>(
        &mut self,
        pos: NodeId,
        src: &Tree<T, B>,
        from: NodeId,
    ) -> NodeId
    where
        T: Clone,
    {
        let slot = self.slot_last_child(pos);
        self.graft_copy(slot, src, from, false)
    }

    #[instrument(level = "trace", skip(self, src))]
    pub fn prepend_child_subtree<B: NodeAllocator<T>>(
        &mut self,
        pos: NodeId,
        src: &Tree<T, B>,
        from: NodeId,
    ) -> NodeId
    where
        T: Clone,
    {
        let slot = self.slot_first_child(pos);
        self.graft_copy(slot, src, from, false)
    }

    /// Appends copies of the sibling run `[from, to)` of `src` as the last
    /// children of `pos`. Returns the first copy, if any.
    #[instrument(level = "trace", skip(self, src))]
    pub fn append_children<B: NodeAllocator<T>>(
        &mut self,
        pos: NodeId,
        src: &Tree<T, B>,
        from: &Sibling,
        to: &Sibling,
    ) -> Option<NodeId>
    where
        T: Clone,
    {
        let mut first = None;
        for source in src.sibling_run(from, to) {
            let slot = self.slot_last_child(pos);
            let copy = self.graft_copy(slot, src, source, false);
            first.get_or_insert(copy);
        }
        first
    }

    /// Prepends copies of the sibling run `[from, to)` of `src` in front of
    /// `pos`'s children, keeping their order.
    #[instrument(level = "trace", skip(self, src))]
    pub fn prepend_children<B: NodeAllocator<T>>(
        &mut self,
        pos: NodeId,
        src: &Tree<T, B>,
        from: &Sibling,
        to: &Sibling,
    ) -> Option<NodeId>
    where
        T: Clone,
    {
        let mut first = None;
        let mut previous: Option<NodeId> = None;
        for source in src.sibling_run(from, to) {
            let slot = match previous {
                Some(prev) => self.slot_after(prev),
                None => self.slot_first_child(pos),
            };
            let copy = self.graft_copy(slot, src, source, false);
            first.get_or_insert(copy);
            previous = Some(copy);
        }
        first
    }

    // ============================================================
    // Erase
    // ============================================================

    /// Destroys `pos` and its subtree. Returns the node that followed the
    /// subtree in pre-order (the feet sentinel at the very end).
    #[instrument(level = "trace", skip(self))]
    pub fn erase(&mut self, pos: NodeId) -> NodeId {
        assert!(self.is_valid(pos), "erase of sentinel or stale node {pos:?}");
        let mut successor = PreOrder::new(pos);
        successor.next_skip_children(self);
        self.unlink(pos);
        self.destroy(pos);
        successor.node().unwrap_or(self.feet())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn erase_children(&mut self, pos: NodeId) {
        let node = self.node(pos);
        if let (Some(first), Some(last)) = (node.first_child, node.last_child) {
            self.discard_run(first, last);
        }
    }

    /// Erases every sibling following `pos`.
    #[instrument(level = "trace", skip(self))]
    pub fn erase_right_siblings(&mut self, pos: NodeId) {
        if let Some(first) = self.next_sibling(pos) {
            let last = Sibling::at(self, pos).range_last(self).unwrap_or(first);
            self.discard_run(first, last);
        }
    }

    /// Erases every sibling preceding `pos`.
    #[instrument(level = "trace", skip(self))]
    pub fn erase_left_siblings(&mut self, pos: NodeId) {
        if let Some(last) = self.previous_sibling(pos) {
            let first = Sibling::at(self, pos).range_first(self).unwrap_or(last);
            self.discard_run(first, last);
        }
    }

    fn discard_run(&mut self, first: NodeId, last: NodeId) {
        let mut doomed = vec![first];
        let mut cursor = first;
        while cursor != last {
            match self.node(cursor).next_sibling {
                Some(next) => {
                    doomed.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        self.unlink_range(first, last);
        for root in doomed {
            self.destroy(root);
        }
    }

    /// Erases every node; the sentinels stay.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        if let (Some(first), Some(last)) = (self.first_root(), self.last_root()) {
            let size = self.size();
            self.discard_run(first, last);
            debug!(size, "cleared tree");
        }
    }

    // ============================================================
    // Replace
    // ============================================================

    /// Swaps the payload of `pos` in place and returns the old one.
    #[instrument(level = "trace", skip(self, value))]
    pub fn replace(&mut self, pos: NodeId, value: T) -> T {
        std::mem::replace(self.get_mut(pos), value)
    }

    /// Replaces `pos` and its subtree by a copy of `src`'s subtree at
    /// `from`, in the same position. `pos`'s handle dies; the copy's root
    /// handle is returned.
    #[instrument(level = "trace", skip(self, src))]
    pub fn replace_with_subtree<B: NodeAllocator<T>>(&mut self, pos: NodeId, src: &Tree<T, B>, from: NodeId) -> NodeId
    where
        T: Clone,
    {
        assert!(self.is_valid(pos), "replace of sentinel or stale node {pos:?}");
        let slot = self.unlink(pos);
        self.destroy(pos);
        self.graft_copy(slot, src, from, false)
    }

    /// Replaces the sibling run `[orig_begin, orig_end)` by a copy of the
    /// run `[new_begin, new_end)` of `src`. Returns the first copy, `None`
    /// if the new run is empty.
    #[instrument(level = "trace", skip(self, src))]
    pub fn replace_range<B: NodeAllocator<T>>(
        &mut self,
        orig_begin: &Sibling,
        orig_end: &Sibling,
        src: &Tree<T, B>,
        new_begin: &Sibling,
        new_end: &Sibling,
    ) -> Option<NodeId>
    where
        T: Clone,
    {
        let doomed = self.sibling_run(orig_begin, orig_end);
        let mut first = None;
        for source in src.sibling_run(new_begin, new_end) {
            let copy = self.insert_subtree_at(orig_begin, src, source);
            first.get_or_insert(copy);
        }
        if let (Some(&head), Some(&tail)) = (doomed.first(), doomed.last()) {
            self.discard_run(head, tail);
        }
        first
    }
}

//! The tree container.
//!
//! Every tree owns two payload-less sentinels. `head` precedes the first
//! top-level node and `feet` follows the last one; top-level nodes have no
//! parent and are chained between them. All structural edits go through
//! [`Tree::link_range`] and [`Tree::unlink_range`], which keep the subtree
//! counters of every ancestor current.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use tracing::{debug, instrument};

use crate::alloc::{MapAllocator, NodeAllocator};
use crate::config::TreeConfig;
use crate::cursor::{Cursor, PreOrder, Sibling};
use crate::errors::{TreeError, TreeResult};
use crate::node::{Node, NodeId, Tally};

pub struct Tree<T, A: NodeAllocator<T> = MapAllocator<T>> {
    alloc: A,
    head: NodeId,
    feet: NodeId,
    _payload: PhantomData<T>,
}

/// Insertion point between two siblings (either may be a sentinel) or at
/// one end of a parent's child list.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

#[derive(Debug, Clone, Copy)]
enum Sign {
    Grow,
    Shrink,
}

impl Sign {
    fn apply(self, field: &mut usize, by: usize) {
        match self {
            Sign::Grow => *field += by,
            Sign::Shrink => *field -= by,
        }
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_config_in(config, MapAllocator::new())
    }

    /// Tree holding a single top-level node.
    pub fn with_root(value: T) -> Self {
        let mut tree = Self::new();
        tree.set_root(value);
        tree
    }
}

impl<T, A: NodeAllocator<T>> Default for Tree<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    pub fn new_in(alloc: A) -> Self {
        Self::with_config_in(TreeConfig::default(), alloc)
    }

    pub fn with_config_in(config: TreeConfig, mut alloc: A) -> Self {
        let (head, feet) = (NodeId::fresh(), NodeId::fresh());
        alloc.allocate(head, Node::sentinel(config.expand_new, config.visible_new));
        alloc.allocate(feet, Node::sentinel(false, true));
        let mut tree = Self {
            alloc,
            head,
            feet,
            _payload: PhantomData,
        };
        tree.node_mut(head).next_sibling = Some(feet);
        tree.node_mut(feet).prev_sibling = Some(head);
        tree
    }

    /// Current tree-wide defaults for new nodes.
    pub fn config(&self) -> TreeConfig {
        let head = self.node(self.head);
        TreeConfig {
            expand_new: head.expanded,
            visible_new: head.visible,
        }
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Exchanges the contents of two trees in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    // ============================================================
    // Record access
    // ============================================================

    /// The record behind a handle.
    ///
    /// # Panics
    /// If `id` is stale or belongs to another tree.
    #[track_caller]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        match self.alloc.get(id) {
            Some(node) => node,
            None => panic!("stale or foreign node handle {id:?}"),
        }
    }

    #[track_caller]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.alloc.get_mut(id) {
            Some(node) => node,
            None => panic!("stale or foreign node handle {id:?}"),
        }
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn feet(&self) -> NodeId {
        self.feet
    }

    pub fn is_sentinel(&self, id: NodeId) -> bool {
        id == self.head || id == self.feet
    }

    /// True for live, payload-carrying nodes of this tree.
    pub fn is_valid(&self, id: NodeId) -> bool {
        self.alloc.get(id).is_some_and(|node| !node.is_sentinel())
    }

    /// Payload of a node.
    ///
    /// # Panics
    /// On sentinels and stale handles.
    #[track_caller]
    pub fn get(&self, id: NodeId) -> &T {
        match self.node(id).data.as_ref() {
            Some(value) => value,
            None => panic!("sentinel {id:?} carries no payload"),
        }
    }

    #[track_caller]
    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        match self.node_mut(id).data.as_mut() {
            Some(value) => value,
            None => panic!("sentinel {id:?} carries no payload"),
        }
    }

    // ============================================================
    // Navigation (sentinels filtered out)
    // ============================================================

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling.filter(|&next| next != self.feet)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling.filter(|&prev| prev != self.head)
    }

    pub fn first_root(&self) -> Option<NodeId> {
        self.node(self.head).next_sibling.filter(|&id| id != self.feet)
    }

    pub fn last_root(&self) -> Option<NodeId> {
        self.node(self.feet).prev_sibling.filter(|&id| id != self.head)
    }

    pub fn is_top_level(&self, id: NodeId) -> bool {
        self.is_valid(id) && self.node(id).parent.is_none()
    }

    /// The `n`-th child of `id`, counting from zero.
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        let mut child = self.node(id).first_child;
        for _ in 0..n {
            child = self.node(child?).next_sibling;
        }
        child
    }

    /// The `n`-th node of `id`'s sibling list, counting from its first
    /// sibling.
    pub fn sibling(&self, id: NodeId, n: usize) -> Option<NodeId> {
        let mut sibling = Sibling::at(self, id).range_first(self);
        for _ in 0..n {
            sibling = self.next_sibling(sibling?);
        }
        sibling
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Number of payload nodes.
    pub fn size(&self) -> usize {
        self.node(self.head).count
    }

    /// Number of nodes in the subtree rooted at `id`, `id` included.
    pub fn size_of(&self, id: NodeId) -> usize {
        self.node(id).count
    }

    pub fn is_empty(&self) -> bool {
        self.node(self.head).next_sibling == Some(self.feet)
    }

    /// Distance to the top level; top-level nodes have depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.node(id).parent;
        while let Some(parent) = cursor {
            depth += 1;
            cursor = self.node(parent).parent;
        }
        depth
    }

    /// Distance from `root` down to `id`, `None` if `root` is not an
    /// ancestor of (or equal to) `id`.
    pub fn depth_to(&self, id: NodeId, root: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut cursor = id;
        while cursor != root {
            cursor = self.node(cursor).parent?;
            depth += 1;
        }
        Some(depth)
    }

    /// Depth of the deepest node, `None` for an empty tree.
    pub fn max_depth(&self) -> Option<usize> {
        let mut deepest = None;
        let mut root = self.first_root();
        while let Some(id) = root {
            deepest = deepest.max(Some(self.max_depth_of(id)));
            root = self.next_sibling(id);
        }
        deepest
    }

    /// Height of the subtree below `id`; 0 for a leaf.
    pub fn max_depth_of(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut level = 0;
        let mut cursor = id;
        loop {
            if let Some(child) = self.node(cursor).first_child {
                cursor = child;
                level += 1;
                deepest = deepest.max(level);
                continue;
            }
            loop {
                if cursor == id {
                    return deepest;
                }
                let node = self.node(cursor);
                if let Some(next) = node.next_sibling {
                    cursor = next;
                    break;
                }
                cursor = match node.parent {
                    Some(parent) => parent,
                    None => return deepest,
                };
                level -= 1;
            }
        }
    }

    pub fn number_of_children(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut child = self.node(id).first_child;
        while let Some(current) = child {
            count += 1;
            child = self.node(current).next_sibling;
        }
        count
    }

    /// Siblings of `id`, `id` itself excluded.
    pub fn number_of_siblings(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut cursor = self.previous_sibling(id);
        while let Some(prev) = cursor {
            count += 1;
            cursor = self.previous_sibling(prev);
        }
        cursor = self.next_sibling(id);
        while let Some(next) = cursor {
            count += 1;
            cursor = self.next_sibling(next);
        }
        count
    }

    /// Position of `id` among its siblings.
    pub fn index(&self, id: NodeId) -> usize {
        let mut index = 0;
        let mut cursor = self.previous_sibling(id);
        while let Some(prev) = cursor {
            index += 1;
            cursor = self.previous_sibling(prev);
        }
        index
    }

    /// True if `top` is `id` or one of its ancestors.
    pub fn is_in_subtree(&self, id: NodeId, top: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == top {
                return true;
            }
            cursor = self.node(current).parent;
        }
        false
    }

    /// True if `id` lies in the subtree of any node of the sibling run
    /// `[begin, end)`.
    pub fn is_in_subtree_range(&self, id: NodeId, begin: &Sibling, end: &Sibling) -> bool {
        self.sibling_run(begin, end)
            .into_iter()
            .any(|top| self.is_in_subtree(id, top))
    }

    /// Nodes of the sibling run `[begin, end)`.
    pub(crate) fn sibling_run(&self, begin: &Sibling, end: &Sibling) -> Vec<NodeId> {
        let mut run = Vec::new();
        let mut cursor = begin.node();
        while let Some(id) = cursor {
            if cursor == end.node() || self.is_sentinel(id) {
                break;
            }
            run.push(id);
            cursor = self.node(id).next_sibling;
        }
        run
    }

    // ============================================================
    // Slots and link primitives
    // ============================================================

    #[track_caller]
    pub(crate) fn slot_before(&self, pos: NodeId) -> Slot {
        assert!(pos != self.head, "cannot place a node before the head sentinel");
        let node = self.node(pos);
        Slot {
            parent: node.parent,
            prev: node.prev_sibling,
            next: Some(pos),
        }
    }

    #[track_caller]
    pub(crate) fn slot_after(&self, pos: NodeId) -> Slot {
        assert!(pos != self.feet, "cannot place a node after the feet sentinel");
        let node = self.node(pos);
        Slot {
            parent: node.parent,
            prev: Some(pos),
            next: node.next_sibling,
        }
    }

    #[track_caller]
    pub(crate) fn slot_first_child(&self, parent: NodeId) -> Slot {
        assert!(self.is_valid(parent), "sentinels cannot have children");
        Slot {
            parent: Some(parent),
            prev: None,
            next: self.node(parent).first_child,
        }
    }

    #[track_caller]
    pub(crate) fn slot_last_child(&self, parent: NodeId) -> Slot {
        assert!(self.is_valid(parent), "sentinels cannot have children");
        Slot {
            parent: Some(parent),
            prev: self.node(parent).last_child,
            next: None,
        }
    }

    /// Slot in front of a sibling cursor; an end cursor appends to its
    /// parent's children.
    #[track_caller]
    pub(crate) fn slot_at(&self, pos: &Sibling) -> Slot {
        match (pos.node(), pos.parent()) {
            (Some(id), _) => self.slot_before(id),
            (None, Some(parent)) => self.slot_last_child(parent),
            (None, None) => panic!("sibling cursor has neither node nor parent"),
        }
    }

    /// Allocates an unattached node carrying the tree-wide defaults.
    pub(crate) fn create(&mut self, value: T) -> NodeId {
        let head = self.node(self.head);
        let node = Node::new(value, head.expanded, head.visible);
        let id = NodeId::fresh();
        self.alloc.allocate(id, node);
        id
    }

    pub(crate) fn create_with(&mut self, value: T, expanded: bool, visible: bool) -> NodeId {
        let id = NodeId::fresh();
        self.alloc.allocate(id, Node::new(value, expanded, visible));
        id
    }

    /// Splices the detached sibling run `first..=last` into `slot` and
    /// credits its counters to the new ancestors.
    pub(crate) fn link_range(&mut self, first: NodeId, last: NodeId, slot: Slot) {
        let mut tally = Tally::default();
        let mut cursor = first;
        loop {
            let node = self.node_mut(cursor);
            node.parent = slot.parent;
            tally += node.tally();
            if cursor == last {
                break;
            }
            cursor = match node.next_sibling {
                Some(next) => next,
                None => panic!("{first:?}..={last:?} is not a sibling run"),
            };
        }
        self.node_mut(first).prev_sibling = slot.prev;
        self.node_mut(last).next_sibling = slot.next;
        match slot.prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(first),
            None => self.node_mut(Self::slot_parent(&slot)).first_child = Some(first),
        }
        match slot.next {
            Some(next) => self.node_mut(next).prev_sibling = Some(last),
            None => self.node_mut(Self::slot_parent(&slot)).last_child = Some(last),
        }
        self.propagate(slot.parent, tally, Sign::Grow);
    }

    pub(crate) fn link(&mut self, id: NodeId, slot: Slot) {
        self.link_range(id, id, slot);
    }

    /// Detaches the sibling run `first..=last` (subtrees included) and
    /// returns the slot it occupied.
    pub(crate) fn unlink_range(&mut self, first: NodeId, last: NodeId) -> Slot {
        let (parent, prev) = {
            let node = self.node(first);
            (node.parent, node.prev_sibling)
        };
        let next = self.node(last).next_sibling;
        let slot = Slot { parent, prev, next };
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => self.node_mut(Self::slot_parent(&slot)).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.node_mut(Self::slot_parent(&slot)).last_child = prev,
        }

        let mut tally = Tally::default();
        let mut cursor = first;
        loop {
            let node = self.node_mut(cursor);
            node.parent = None;
            tally += node.tally();
            if cursor == last {
                break;
            }
            cursor = match node.next_sibling {
                Some(next) => next,
                None => panic!("{first:?}..={last:?} is not a sibling run"),
            };
        }
        self.node_mut(first).prev_sibling = None;
        self.node_mut(last).next_sibling = None;
        self.propagate(parent, tally, Sign::Shrink);
        slot
    }

    pub(crate) fn unlink(&mut self, id: NodeId) -> Slot {
        assert!(!self.is_sentinel(id), "sentinels cannot be detached");
        self.unlink_range(id, id)
    }

    #[track_caller]
    fn slot_parent(slot: &Slot) -> NodeId {
        match slot.parent {
            Some(parent) => parent,
            None => panic!("open sibling end outside a parent: {slot:?}"),
        }
    }

    /// Applies a subtree delta to every ancestor starting at `from`, then to
    /// the head aggregate. The expanded delta only travels while the chain
    /// above the change stays expanded.
    fn propagate(&mut self, from: Option<NodeId>, tally: Tally, sign: Sign) {
        let mut open = true;
        let mut cursor = from;
        while let Some(id) = cursor {
            let node = self.node_mut(id);
            open &= node.expanded;
            sign.apply(&mut node.count, tally.count);
            sign.apply(&mut node.count_expandable, tally.expandable);
            if open {
                sign.apply(&mut node.count_expanded, tally.expanded);
            }
            cursor = node.parent;
        }
        let head = self.head;
        let node = self.node_mut(head);
        sign.apply(&mut node.count, tally.count);
        sign.apply(&mut node.count_expandable, tally.expandable);
        if open {
            sign.apply(&mut node.count_expanded, tally.expanded);
        }
    }

    /// Adjusts only the expanded counters above `id` after `id`'s own
    /// expanded total gained or lost rows.
    pub(crate) fn propagate_expanded(&mut self, id: NodeId, gained: usize, lost: usize) {
        let parent = self.node(id).parent;
        let grow = Tally {
            expanded: gained,
            ..Tally::default()
        };
        let shrink = Tally {
            expanded: lost,
            ..Tally::default()
        };
        if gained > 0 {
            self.propagate(parent, grow, Sign::Grow);
        }
        if lost > 0 {
            self.propagate(parent, shrink, Sign::Shrink);
        }
    }

    /// Releases every record of a detached subtree, children before parents.
    pub(crate) fn destroy(&mut self, root: NodeId) {
        let mut stack = vec![root];
        let mut doomed = Vec::new();
        while let Some(id) = stack.pop() {
            doomed.push(id);
            let mut child = self.node(id).first_child;
            while let Some(current) = child {
                stack.push(current);
                child = self.node(current).next_sibling;
            }
        }
        for id in doomed.into_iter().rev() {
            self.alloc.deallocate(id);
        }
    }

    /// Takes the records of `src`'s detached subtree at `root` into this
    /// tree's store. Handles, links and counters stay as they are. Returns
    /// the number of records taken.
    pub(crate) fn take_subtree<B: NodeAllocator<T>>(&mut self, src: &mut Tree<T, B>, root: NodeId) -> usize {
        let mut stack = vec![root];
        let mut taken = 0;
        while let Some(id) = stack.pop() {
            let mut child = src.node(id).first_child;
            while let Some(current) = child {
                stack.push(current);
                child = src.node(current).next_sibling;
            }
            let node = src.alloc.hand_over(id);
            self.alloc.take_over(id, node);
            taken += 1;
        }
        taken
    }

    // ============================================================
    // Consistency
    // ============================================================

    /// Checks link symmetry, parent/child agreement and all counters.
    #[instrument(level = "debug", skip(self))]
    pub fn verify_consistency(&self) -> TreeResult<()> {
        let fault = |node: NodeId, reason: &str| TreeError::Inconsistent {
            node,
            reason: reason.to_string(),
        };
        let head = self.node(self.head);
        if head.parent.is_some() || head.prev_sibling.is_some() || head.first_child.is_some() {
            return Err(fault(self.head, "head sentinel has stray links"));
        }
        let feet = self.node(self.feet);
        if feet.parent.is_some() || feet.next_sibling.is_some() || feet.first_child.is_some() {
            return Err(fault(self.feet, "feet sentinel has stray links"));
        }

        let budget = self.alloc.live();
        let mut visited = 0usize;
        let mut roots = Tally::default();
        let mut cursor = PreOrder::at(head.next_sibling);
        while let Some(id) = cursor.node() {
            if id == self.feet {
                break;
            }
            visited += 1;
            if visited > budget {
                return Err(fault(id, "walk exceeds live records, links form a cycle"));
            }
            let node = self.node(id);
            if node.is_sentinel() {
                return Err(fault(id, "sentinel reachable inside the tree"));
            }
            match node.next_sibling {
                Some(next) if self.node(next).prev_sibling != Some(id) => {
                    return Err(fault(id, "next sibling does not link back"));
                }
                None if node.parent.is_none() => {
                    return Err(fault(id, "top-level node not terminated by feet"));
                }
                None => {
                    if node.parent.map(|p| self.node(p).last_child) != Some(Some(id)) {
                        return Err(fault(id, "last sibling is not its parent's last child"));
                    }
                }
                Some(_) => {}
            }
            match node.prev_sibling {
                Some(prev) if self.node(prev).next_sibling != Some(id) => {
                    return Err(fault(id, "previous sibling does not link back"));
                }
                None => {
                    if node.parent.map(|p| self.node(p).first_child) != Some(Some(id)) {
                        return Err(fault(id, "first sibling is not its parent's first child"));
                    }
                }
                Some(_) => {}
            }

            let mut children = Tally::default();
            let mut child = node.first_child;
            while let Some(current) = child {
                let record = self.node(current);
                if record.parent != Some(id) {
                    return Err(fault(current, "child does not point at its parent"));
                }
                children += record.tally();
                child = record.next_sibling;
            }
            let shown = usize::from(node.visible);
            let expected = Tally {
                count: 1 + children.count,
                expanded: shown + if node.expanded { children.expanded } else { 0 },
                expandable: shown + children.expandable,
            };
            if node.tally() != expected {
                return Err(fault(id, "subtree counters out of date"));
            }
            if node.parent.is_none() {
                roots += node.tally();
            }
            cursor.advance(self);
        }
        let head = self.node(self.head);
        if head.tally() != roots {
            return Err(fault(self.head, "head aggregate out of date"));
        }
        if budget != head.count + 2 {
            return Err(fault(self.head, "allocator holds unreachable records"));
        }
        debug!(nodes = visited, "tree consistent");
        Ok(())
    }
}

impl<T, A: NodeAllocator<T>> Drop for Tree<T, A> {
    fn drop(&mut self) {
        self.clear();
        let (head, feet) = (self.head, self.feet);
        self.alloc.deallocate(head);
        self.alloc.deallocate(feet);
    }
}

impl<T, A: NodeAllocator<T>> Index<NodeId> for Tree<T, A> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        self.get(id)
    }
}

impl<T, A: NodeAllocator<T>> IndexMut<NodeId> for Tree<T, A> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        self.get_mut(id)
    }
}

impl<T: Clone, A: NodeAllocator<T>> Clone for Tree<T, A> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_config_in(self.config(), A::default());
        let mut root = self.first_root();
        while let Some(id) = root {
            let slot = copy.slot_before(copy.feet);
            copy.graft_copy(slot, self, id, true);
            root = self.next_sibling(id);
        }
        copy
    }
}

impl<T: PartialEq, A: NodeAllocator<T>, B: NodeAllocator<T>> PartialEq<Tree<T, B>> for Tree<T, A> {
    fn eq(&self, other: &Tree<T, B>) -> bool {
        self.size() == other.size()
            && self.equal(&self.begin_roots(), &self.end_roots(), other, &other.begin_roots())
    }
}

impl<T: fmt::Debug, A: NodeAllocator<T>> fmt::Debug for Tree<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|(id, value)| (self.depth(id), value)))
            .finish()
    }
}

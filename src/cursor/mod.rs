//! Cursor family
//!
//! A cursor is a small position handle: it never borrows the tree, every
//! navigation call takes the tree it walks. Cursors therefore survive any
//! mutation that leaves their node alive. [`Walk`] bridges a begin/end pair
//! into a borrowing [`Iterator`].

mod breadth_first;
mod expanded;
mod fixed_depth;
mod leaf;
mod post_order;
mod pre_order;
mod sibling;
mod walk;

pub use breadth_first::BreadthFirst;
pub use expanded::{Expandable, Expanded};
pub use fixed_depth::FixedDepth;
pub use leaf::Leaf;
pub use post_order::PostOrder;
pub use pre_order::PreOrder;
pub use sibling::Sibling;
pub use walk::Walk;

use crate::alloc::NodeAllocator;
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::Tree;

pub trait Cursor: Clone + PartialEq {
    /// Current node, `None` at a null end position.
    fn node(&self) -> Option<NodeId>;

    /// Moves to the next position of this traversal order.
    ///
    /// # Panics
    /// When already at a null end position.
    fn advance<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>);

    fn set_skip_children(&mut self, skip: bool);

    /// Makes the next [`advance`](Cursor::advance) pass over the current
    /// node's children.
    fn skip_children(&mut self) {
        self.set_skip_children(true);
    }

    fn advance_by<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>, n: usize) {
        for _ in 0..n {
            self.advance(tree);
        }
    }

    fn next_skip_children<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>) {
        self.skip_children();
        self.advance(tree);
    }

    fn is_valid<T, A: NodeAllocator<T>>(&self, tree: &Tree<T, A>) -> bool {
        self.node().is_some_and(|id| tree.is_valid(id))
    }

    #[track_caller]
    fn get<'t, T, A: NodeAllocator<T>>(&self, tree: &'t Tree<T, A>) -> &'t T {
        match self.node() {
            Some(id) => tree.get(id),
            None => panic!("dereferencing a cursor at its end position"),
        }
    }

    fn number_of_children<T, A: NodeAllocator<T>>(&self, tree: &Tree<T, A>) -> usize {
        self.node().map_or(0, |id| tree.number_of_children(id))
    }

    #[track_caller]
    fn begin_children<T, A: NodeAllocator<T>>(&self, tree: &Tree<T, A>) -> Sibling {
        match self.node() {
            Some(id) => tree.begin_children(id),
            None => panic!("end position has no children"),
        }
    }

    #[track_caller]
    fn end_children(&self) -> Sibling {
        match self.node() {
            Some(id) => Sibling::end_of(id),
            None => panic!("end position has no children"),
        }
    }
}

pub trait BidirectionalCursor: Cursor {
    fn retreat<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>);

    fn retreat_by<T, A: NodeAllocator<T>>(&mut self, tree: &Tree<T, A>, n: usize) {
        for _ in 0..n {
            self.retreat(tree);
        }
    }
}

/// Next sibling of `id` or of its nearest ancestor that has one.
pub(crate) fn climb_to_next<T, A: NodeAllocator<T>>(tree: &Tree<T, A>, mut id: NodeId) -> Option<NodeId> {
    loop {
        let node = tree.node(id);
        if let Some(next) = node.next_sibling {
            return Some(next);
        }
        id = node.parent?;
    }
}

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    // ============================================================
    // Cursor positions
    // ============================================================

    pub fn begin(&self) -> PreOrder {
        PreOrder::at(self.node(self.head()).next_sibling)
    }

    pub fn end(&self) -> PreOrder {
        PreOrder::new(self.feet())
    }

    pub fn begin_post(&self) -> PostOrder {
        let mut cursor = PostOrder::new(self.begin().node().unwrap_or(self.feet()));
        cursor.descend_all(self);
        cursor
    }

    pub fn end_post(&self) -> PostOrder {
        PostOrder::new(self.feet())
    }

    /// Level-order over every top-level tree.
    pub fn begin_breadth_first(&self) -> BreadthFirst {
        BreadthFirst::from_roots(self.roots().map(|(id, _)| id))
    }

    pub fn end_breadth_first(&self) -> BreadthFirst {
        BreadthFirst::end()
    }

    /// First node `depth` levels below `pos`, bounded to `pos`'s subtree.
    pub fn begin_fixed(&self, pos: NodeId, depth: usize) -> TreeResult<FixedDepth> {
        match fixed_depth::first_at_depth(self, pos, depth) {
            Some(id) => Ok(FixedDepth::within(id, pos)),
            None => Err(TreeError::DepthOutOfRange { depth }),
        }
    }

    pub fn end_fixed(&self, pos: NodeId) -> FixedDepth {
        FixedDepth::end_within(pos)
    }

    /// Next node at the same depth anywhere in the tree.
    pub fn next_at_same_depth(&self, id: NodeId) -> TreeResult<NodeId> {
        let mut cursor = FixedDepth::new(id);
        cursor.advance(self);
        cursor.node().ok_or(TreeError::NoNodeAtSameDepth)
    }

    pub fn begin_children(&self, id: NodeId) -> Sibling {
        Sibling::raw(self.node(id).first_child, Some(id))
    }

    pub fn end_children(&self, id: NodeId) -> Sibling {
        Sibling::end_of(id)
    }

    pub fn begin_roots(&self) -> Sibling {
        Sibling::raw(self.node(self.head()).next_sibling, None)
    }

    pub fn end_roots(&self) -> Sibling {
        Sibling::raw(Some(self.feet()), None)
    }

    pub fn begin_leaf(&self) -> Leaf {
        Leaf::at(leaf::deepest_first(self, self.begin().node().unwrap_or(self.feet())))
    }

    pub fn end_leaf(&self) -> Leaf {
        Leaf::at(self.feet())
    }

    /// First leaf below `top`; equals [`end_leaf_under`](Tree::end_leaf_under)
    /// when `top` itself is a leaf.
    pub fn begin_leaf_under(&self, top: NodeId) -> Leaf {
        Leaf::within(leaf::deepest_first(self, top), top)
    }

    pub fn end_leaf_under(&self, top: NodeId) -> Leaf {
        Leaf::within(top, top)
    }

    pub fn begin_expanded(&self) -> Expanded {
        let mut cursor = Expanded::new(self.head());
        cursor.advance(self);
        cursor
    }

    pub fn end_expanded(&self) -> Expanded {
        Expanded::new(self.feet())
    }

    pub fn begin_expandable(&self) -> Expandable {
        let mut cursor = Expandable::new(self.head());
        cursor.advance(self);
        cursor
    }

    pub fn end_expandable(&self) -> Expandable {
        Expandable::new(self.feet())
    }

    // ============================================================
    // Iterators
    // ============================================================

    /// Walks `[begin, end)` with any cursor kind.
    pub fn walk<C: Cursor>(&self, begin: C, end: C) -> Walk<'_, T, A, C> {
        Walk::new(self, begin, end)
    }

    /// Pre-order over the whole tree.
    pub fn iter(&self) -> Walk<'_, T, A, PreOrder> {
        self.walk(self.begin(), self.end())
    }

    /// Pre-order over the subtree rooted at `id`.
    pub fn iter_subtree(&self, id: NodeId) -> Walk<'_, T, A, PreOrder> {
        let mut end = PreOrder::new(id);
        end.next_skip_children(self);
        self.walk(PreOrder::new(id), end)
    }

    pub fn iter_post(&self) -> Walk<'_, T, A, PostOrder> {
        self.walk(self.begin_post(), self.end_post())
    }

    pub fn iter_breadth_first(&self) -> Walk<'_, T, A, BreadthFirst> {
        self.walk(self.begin_breadth_first(), self.end_breadth_first())
    }

    pub fn iter_breadth_first_from(&self, id: NodeId) -> Walk<'_, T, A, BreadthFirst> {
        self.walk(BreadthFirst::new(id), BreadthFirst::end())
    }

    pub fn iter_fixed(&self, pos: NodeId, depth: usize) -> TreeResult<Walk<'_, T, A, FixedDepth>> {
        Ok(self.walk(self.begin_fixed(pos, depth)?, self.end_fixed(pos)))
    }

    pub fn iter_leaves(&self) -> Walk<'_, T, A, Leaf> {
        self.walk(self.begin_leaf(), self.end_leaf())
    }

    pub fn iter_leaves_under(&self, top: NodeId) -> Walk<'_, T, A, Leaf> {
        self.walk(self.begin_leaf_under(top), self.end_leaf_under(top))
    }

    pub fn iter_expanded(&self) -> Walk<'_, T, A, Expanded> {
        self.walk(self.begin_expanded(), self.end_expanded())
    }

    pub fn iter_expandable(&self) -> Walk<'_, T, A, Expandable> {
        self.walk(self.begin_expandable(), self.end_expandable())
    }

    pub fn children(&self, id: NodeId) -> Walk<'_, T, A, Sibling> {
        self.walk(self.begin_children(id), self.end_children(id))
    }

    pub fn roots(&self) -> Walk<'_, T, A, Sibling> {
        self.walk(self.begin_roots(), self.end_roots())
    }
}

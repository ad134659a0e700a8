use crate::alloc::NodeAllocator;
use crate::cursor::{Cursor, PreOrder, Sibling};
use crate::node::NodeId;
use crate::tree::Tree;

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    /// Compares the subtrees of each node in `[begin, end)` with the
    /// subtrees of as many siblings starting at `other_begin` in `other`.
    pub fn equal<B: NodeAllocator<T>>(
        &self,
        begin: &Sibling,
        end: &Sibling,
        other: &Tree<T, B>,
        other_begin: &Sibling,
    ) -> bool
    where
        T: PartialEq,
    {
        self.equal_by(begin, end, other, other_begin, |a, b| a == b)
    }

    pub fn equal_by<B, F>(
        &self,
        begin: &Sibling,
        end: &Sibling,
        other: &Tree<T, B>,
        other_begin: &Sibling,
        mut same: F,
    ) -> bool
    where
        B: NodeAllocator<T>,
        F: FnMut(&T, &T) -> bool,
    {
        let mut theirs = other_begin.node();
        for mine in self.sibling_run(begin, end) {
            let Some(id) = theirs.filter(|&id| other.is_valid(id)) else {
                return false;
            };
            if !self.equal_subtree_by(mine, other, id, &mut same) {
                return false;
            }
            theirs = other.node(id).next_sibling;
        }
        true
    }

    /// True if both subtrees have the same shape and equal payloads at
    /// every position.
    pub fn equal_subtree<B: NodeAllocator<T>>(&self, one: NodeId, other: &Tree<T, B>, two: NodeId) -> bool
    where
        T: PartialEq,
    {
        self.equal_subtree_by(one, other, two, |a, b| a == b)
    }

    pub fn equal_subtree_by<B, F>(&self, one: NodeId, other: &Tree<T, B>, two: NodeId, mut same: F) -> bool
    where
        B: NodeAllocator<T>,
        F: FnMut(&T, &T) -> bool,
    {
        let mut end = PreOrder::new(one);
        end.next_skip_children(self);
        let mut mine = PreOrder::new(one);
        let mut theirs = PreOrder::new(two);
        while mine != end {
            let (Some(a), Some(b)) = (mine.node(), theirs.node()) else {
                return false;
            };
            if !other.is_valid(b)
                || !same(self.get(a), other.get(b))
                || self.number_of_children(a) != other.number_of_children(b)
            {
                return false;
            }
            mine.advance(self);
            theirs.advance(other);
        }
        true
    }
}

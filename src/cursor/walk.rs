use std::iter::FusedIterator;

use super::Cursor;
use crate::alloc::NodeAllocator;
use crate::node::NodeId;
use crate::tree::Tree;

/// Borrowing iterator over `[begin, end)` of any cursor kind.
pub struct Walk<'t, T, A: NodeAllocator<T>, C> {
    tree: &'t Tree<T, A>,
    cursor: C,
    end: C,
}

impl<'t, T, A: NodeAllocator<T>, C: Cursor> Walk<'t, T, A, C> {
    pub(crate) fn new(tree: &'t Tree<T, A>, begin: C, end: C) -> Self {
        Self {
            tree,
            cursor: begin,
            end,
        }
    }

    /// Position the next call to [`Iterator::next`] would yield.
    pub fn cursor(&self) -> &C {
        &self.cursor
    }
}

impl<'t, T, A: NodeAllocator<T>, C: Cursor> Iterator for Walk<'t, T, A, C> {
    type Item = (NodeId, &'t T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.end {
            return None;
        }
        let id = self.cursor.node()?;
        let value = self.tree.node(id).data.as_ref()?;
        self.cursor.advance(self.tree);
        Some((id, value))
    }
}

impl<'t, T, A: NodeAllocator<T>, C: Cursor> FusedIterator for Walk<'t, T, A, C> {}

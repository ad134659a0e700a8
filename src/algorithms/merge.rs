use tracing::{instrument, trace};

use crate::alloc::NodeAllocator;
use crate::cursor::{Cursor, Sibling};
use crate::node::NodeId;
use crate::tree::Tree;

/// One level of a merge in progress: a target range and the source siblings
/// still to fold into it. Below the top level the range is always the
/// current child list of `parent`, so copies made by earlier sources are
/// seen by later ones.
struct Frame {
    parent: Option<NodeId>,
    begin: Sibling,
    end: Sibling,
    sources: std::vec::IntoIter<NodeId>,
}

impl Frame {
    fn bounds<T, A: NodeAllocator<T>>(&self, tree: &Tree<T, A>) -> (Sibling, Sibling) {
        match self.parent {
            Some(parent) => (tree.begin_children(parent), Sibling::end_of(parent)),
            None => (self.begin, self.end),
        }
    }
}

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    /// Folds the sibling run `[from_begin, from_end)` of `src` into the run
    /// `[to_begin, to_end)` of `self`.
    ///
    /// A source node whose payload equals a target node's is merged into the
    /// first such target: their children are merged before the next source
    /// is looked at. A source node without a match is copied in front of
    /// `to_end`. A childless source that matches is dropped, unless
    /// `duplicate_leaves` asks for a copy in front of `to_end`.
    #[instrument(level = "trace", skip(self, src))]
    pub fn merge<B: NodeAllocator<T>>(
        &mut self,
        to_begin: &Sibling,
        to_end: &Sibling,
        src: &Tree<T, B>,
        from_begin: &Sibling,
        from_end: &Sibling,
        duplicate_leaves: bool,
    ) where
        T: Clone + PartialEq,
    {
        let mut work = vec![Frame {
            parent: None,
            begin: *to_begin,
            end: *to_end,
            sources: src.sibling_run(from_begin, from_end).into_iter(),
        }];
        while let Some(frame) = work.last_mut() {
            let Some(source) = frame.sources.next() else {
                work.pop();
                continue;
            };
            let (begin, end) = frame.bounds(self);
            let wanted = src.get(source);
            let found = self
                .sibling_run(&begin, &end)
                .into_iter()
                .find(|&target| self.get(target) == wanted);
            match found {
                Some(target) if src.node(source).first_child.is_some() => {
                    let sources: Vec<NodeId> = src.children(source).map(|(id, _)| id).collect();
                    work.push(Frame {
                        parent: Some(target),
                        begin: self.begin_children(target),
                        end: Sibling::end_of(target),
                        sources: sources.into_iter(),
                    });
                }
                Some(_) if duplicate_leaves => {
                    let copy = self.insert_at(&end, wanted.clone());
                    trace!(?copy, "duplicated matching leaf");
                }
                Some(_) => {}
                None => {
                    let copy = self.insert_subtree_at(&end, src, source);
                    if frame.parent.is_none() && begin == end {
                        frame.begin = Sibling::at(self, copy);
                    }
                }
            }
        }
    }

    /// Merges the single source node `from` into the single target `to`.
    #[instrument(level = "trace", skip(self, src))]
    pub fn merge_nodes<B: NodeAllocator<T>>(
        &mut self,
        to: NodeId,
        src: &Tree<T, B>,
        from: NodeId,
        duplicate_leaves: bool,
    ) where
        T: Clone + PartialEq,
    {
        let to_begin = Sibling::at(self, to);
        let mut to_end = to_begin;
        to_end.advance(self);
        let from_begin = Sibling::at(src, from);
        let mut from_end = from_begin;
        from_end.advance(src);
        self.merge(&to_begin, &to_end, src, &from_begin, &from_end, duplicate_leaves);
    }
}

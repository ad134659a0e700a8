use std::cmp::Ordering;

use itertools::Itertools;
use tracing::instrument;

use crate::alloc::NodeAllocator;
use crate::cursor::Sibling;
use crate::node::NodeId;
use crate::tree::Tree;

impl<T, A: NodeAllocator<T>> Tree<T, A> {
    /// Stable sort of the sibling run `[from, to)` by relinking the nodes;
    /// handles and subtrees move with their payloads. With `deep`, every
    /// level below the run is sorted as well.
    #[instrument(level = "trace", skip(self, compare))]
    pub fn sort_by<F>(&mut self, from: &Sibling, to: &Sibling, mut compare: F, deep: bool)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut work = vec![self.sibling_run(from, to)];
        while let Some(run) = work.pop() {
            if deep {
                for &id in &run {
                    if self.node(id).first_child.is_some() {
                        let children = self.begin_children(id);
                        work.push(self.sibling_run(&children, &Sibling::end_of(id)));
                    }
                }
            }
            self.relink_sorted(run, &mut compare);
        }
    }

    pub fn sort(&mut self, from: &Sibling, to: &Sibling, deep: bool)
    where
        T: Ord,
    {
        self.sort_by(from, to, T::cmp, deep);
    }

    /// Sorts the children of `pos`.
    pub fn sort_children(&mut self, pos: NodeId, deep: bool)
    where
        T: Ord,
    {
        let begin = self.begin_children(pos);
        self.sort(&begin, &Sibling::end_of(pos), deep);
    }

    pub fn sort_children_by<F>(&mut self, pos: NodeId, compare: F, deep: bool)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let begin = self.begin_children(pos);
        self.sort_by(&begin, &Sibling::end_of(pos), compare, deep);
    }

    fn relink_sorted<F>(&mut self, mut run: Vec<NodeId>, compare: &mut F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            return;
        };
        if first == last {
            return;
        }
        let parent = self.node(first).parent;
        let before = self.node(first).prev_sibling;
        let after = self.node(last).next_sibling;

        run.sort_by(|&a, &b| compare(self.get(a), self.get(b)));

        for (&a, &b) in run.iter().tuple_windows() {
            self.node_mut(a).next_sibling = Some(b);
            self.node_mut(b).prev_sibling = Some(a);
        }
        let (head, tail) = (run[0], run[run.len() - 1]);
        self.node_mut(head).prev_sibling = before;
        self.node_mut(tail).next_sibling = after;
        match (before, parent) {
            (Some(prev), _) => self.node_mut(prev).next_sibling = Some(head),
            (None, Some(parent)) => self.node_mut(parent).first_child = Some(head),
            (None, None) => {}
        }
        match (after, parent) {
            (Some(next), _) => self.node_mut(next).prev_sibling = Some(tail),
            (None, Some(parent)) => self.node_mut(parent).last_child = Some(tail),
            (None, None) => {}
        }
    }
}

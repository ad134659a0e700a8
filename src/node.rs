use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Handle of a node.
///
/// Handles are unique across all trees and never reused. A handle stays
/// valid for the node's whole life, across unrelated insertions and
/// removals and across moves into another tree. Handing in a handle whose
/// node has been destroyed, or one the tree does not hold, panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    pub(crate) fn fresh() -> Self {
        Self(NonZeroU64::MIN.saturating_add(NEXT_ID.fetch_add(1, Ordering::Relaxed)))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node record as stored by a [`NodeAllocator`](crate::NodeAllocator).
///
/// Links are navigation only; the tree holding a record is its sole owner.
/// Sentinels carry no payload.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) data: Option<T>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    /// Nodes in this subtree, self included.
    pub(crate) count: usize,
    /// Visible nodes the subtree shows in its current expand state.
    pub(crate) count_expanded: usize,
    /// Visible nodes the subtree shows when fully expanded.
    pub(crate) count_expandable: usize,
    pub(crate) expanded: bool,
    pub(crate) visible: bool,
}

impl<T> Node<T> {
    pub(crate) fn new(data: T, expanded: bool, visible: bool) -> Self {
        let shown = usize::from(visible);
        Self {
            data: Some(data),
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            count: 1,
            count_expanded: shown,
            count_expandable: shown,
            expanded,
            visible,
        }
    }

    pub(crate) fn sentinel(expanded: bool, visible: bool) -> Self {
        Self {
            data: None,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            count: 0,
            count_expanded: 0,
            count_expandable: 0,
            expanded,
            visible,
        }
    }

    /// Payload, `None` for the head and feet sentinels.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    /// Raw sibling link; for top-level nodes this may be the head sentinel.
    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    /// Raw sibling link; for top-level nodes this may be the feet sentinel.
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn count_expanded(&self) -> usize {
        self.count_expanded
    }

    pub fn count_expandable(&self) -> usize {
        self.count_expandable
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_sentinel(&self) -> bool {
        self.data.is_none()
    }

    pub(crate) fn tally(&self) -> Tally {
        Tally {
            count: self.count,
            expanded: self.count_expanded,
            expandable: self.count_expandable,
        }
    }
}

/// Counter totals of a detached or attached subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub count: usize,
    pub expanded: usize,
    pub expandable: usize,
}

impl std::ops::AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.count += rhs.count;
        self.expanded += rhs.expanded;
        self.expandable += rhs.expandable;
    }
}

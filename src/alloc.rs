//! Node storage strategies.
//!
//! A [`Tree`](crate::Tree) asks its allocator to store exactly one record per
//! node it creates (sentinels included) and to release exactly one record per
//! node it destroys. Moving nodes between trees neither creates nor destroys
//! them: the record is handed over from one store to the other under its
//! existing [`NodeId`], so the allocation strategy is not involved.

use std::collections::HashMap;

use crate::node::{Node, NodeId};

pub trait NodeAllocator<T>: Default {
    /// Stores the record of a newly created node.
    fn allocate(&mut self, id: NodeId, node: Node<T>);

    /// Removes the record of a destroyed node, returning it so the payload
    /// can be dropped or moved.
    ///
    /// # Panics
    /// If `id` does not refer to a live record.
    fn deallocate(&mut self, id: NodeId) -> Node<T>;

    fn get(&self, id: NodeId) -> Option<&Node<T>>;

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>>;

    /// Number of live records.
    fn live(&self) -> usize;

    /// Gives up a record that moves to another tree. The node stays alive.
    ///
    /// # Panics
    /// If `id` does not refer to a live record.
    fn hand_over(&mut self, id: NodeId) -> Node<T>;

    /// Takes over a record handed over by another tree's store.
    fn take_over(&mut self, id: NodeId, node: Node<T>);
}

/// Default allocator: records keyed by their handle. Handles are never
/// reused, so a stale or foreign handle simply misses.
#[derive(Debug)]
pub struct MapAllocator<T> {
    records: HashMap<NodeId, Node<T>>,
}

impl<T> Default for MapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MapAllocator<T> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: HashMap::with_capacity(capacity),
        }
    }

    fn remove(&mut self, id: NodeId) -> Node<T> {
        match self.records.remove(&id) {
            Some(node) => node,
            None => panic!("stale or foreign node handle {id:?}"),
        }
    }
}

impl<T> NodeAllocator<T> for MapAllocator<T> {
    fn allocate(&mut self, id: NodeId, node: Node<T>) {
        self.records.insert(id, node);
    }

    fn deallocate(&mut self, id: NodeId) -> Node<T> {
        self.remove(id)
    }

    fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.records.get(&id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.records.get_mut(&id)
    }

    fn live(&self) -> usize {
        self.records.len()
    }

    fn hand_over(&mut self, id: NodeId) -> Node<T> {
        self.remove(id)
    }

    fn take_over(&mut self, id: NodeId, node: Node<T>) {
        self.records.insert(id, node);
    }
}

//! Ordered n-ary tree container.
//!
//! Nodes live in a pluggable allocator and are addressed by [`NodeId`]
//! handles that stay valid for the node's whole life, including moves into
//! another tree. Traversal is done with small cursor values ([`cursor`]) that
//! borrow the tree only per step, so a cursor survives edits elsewhere in
//! the tree.
//!
//! ```
//! use ntree::Tree;
//!
//! let mut tree = Tree::new();
//! let a = tree.set_root("A");
//! let b = tree.append_child(a, "B");
//! tree.append_child(a, "C");
//! tree.append_child(b, "D");
//!
//! let order: Vec<_> = tree.iter().map(|(_, v)| *v).collect();
//! assert_eq!(order, ["A", "B", "D", "C"]);
//! ```

pub mod alloc;
mod algorithms;
mod bookkeeping;
pub mod config;
pub mod cursor;
pub mod display;
pub mod errors;
mod mutate;
pub mod node;
mod transfer;
pub mod tree;
pub mod util;

pub use alloc::{MapAllocator, NodeAllocator};
pub use config::TreeConfig;
pub use cursor::{
    BidirectionalCursor, BreadthFirst, Cursor, Expandable, Expanded, FixedDepth, Leaf, PostOrder, PreOrder, Sibling,
    Walk,
};
pub use display::TreeDisplay;
pub use errors::{TreeError, TreeResult};
pub use node::{Node, NodeId};
pub use tree::Tree;
